// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetbook::commands::{budgets, transactions};
use budgetbook::models::{NewTransaction, TxType};
use budgetbook::{Ledger, cli};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn setup() -> Ledger {
    let mut ledger = Ledger::open_in_memory().unwrap();
    ledger.add_account("A1", Decimal::from(100), "checking").unwrap();
    ledger.add_category("Cat1", None).unwrap();
    for i in 1..=3 {
        let date = NaiveDate::from_ymd_opt(2025, 1, i).unwrap();
        ledger
            .add_transaction(
                NewTransaction::new(date, TxType::Expense, "A1", Some("Cat1"), Decimal::from(10))
                    .with_payee(&format!("Shop {}", i)),
            )
            .unwrap();
    }
    ledger
}

#[test]
fn list_limit_respected() {
    let ledger = setup();
    let matches = cli::build_cli().get_matches_from(["budgetbook", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&ledger, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date.to_string(), "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_search_is_case_insensitive() {
    let ledger = setup();
    let matches =
        cli::build_cli().get_matches_from(["budgetbook", "tx", "list", "--search", "SHOP 2"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&ledger, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].payee.as_deref(), Some("Shop 2"));
}

#[test]
fn tx_add_and_rm_go_through_the_engine() {
    let mut ledger = setup();
    let add = cli::build_cli().get_matches_from([
        "budgetbook",
        "tx",
        "add",
        "--date",
        "2025-01-09",
        "--type",
        "income",
        "--account",
        "A1",
        "--amount",
        "50",
    ]);
    let Some(("tx", tx_m)) = add.subcommand() else {
        panic!("no tx subcommand");
    };
    transactions::handle(&mut ledger, tx_m).unwrap();
    assert_eq!(ledger.ready_to_assign().unwrap(), Decimal::from(150));

    let id = ledger.snapshot().unwrap().transactions.last().unwrap().id;
    let id_arg = id.to_string();
    let rm =
        cli::build_cli().get_matches_from(["budgetbook", "tx", "rm", "--id", id_arg.as_str()]);
    let Some(("tx", tx_m)) = rm.subcommand() else {
        panic!("no tx subcommand");
    };
    transactions::handle(&mut ledger, tx_m).unwrap();
    assert_eq!(ledger.ready_to_assign().unwrap(), Decimal::from(100));
}

#[test]
fn tx_add_trims_padded_account_name() {
    let mut ledger = setup();
    let add = cli::build_cli().get_matches_from([
        "budgetbook",
        "tx",
        "add",
        "--date",
        "2025-01-10",
        "--account",
        " A1 ",
        "--amount",
        "5",
    ]);
    let Some(("tx", tx_m)) = add.subcommand() else {
        panic!("no tx subcommand");
    };
    transactions::handle(&mut ledger, tx_m).unwrap();

    let snapshot = ledger.snapshot().unwrap();
    assert_eq!(snapshot.transactions.last().unwrap().account, "A1");
    assert_eq!(snapshot.account("A1").unwrap().balance, Decimal::from(65));
}

#[test]
fn budget_set_rejects_bad_month() {
    let mut ledger = setup();
    let matches = cli::build_cli().get_matches_from([
        "budgetbook",
        "budget",
        "set",
        "--month",
        "2025-13",
        "--category",
        "Cat1",
        "--amount",
        "5",
    ]);
    let Some(("budget", b_m)) = matches.subcommand() else {
        panic!("no budget subcommand");
    };
    assert!(budgets::handle(&mut ledger, b_m).is_err());
    assert_eq!(ledger.ready_to_assign().unwrap(), Decimal::from(100));
}

#[test]
fn budget_table_has_group_headers_and_total() {
    let mut ledger = setup();
    ledger.set_budgeted_amount("2025-01", "Cat1", Decimal::from(40)).unwrap();
    let view = ledger.budget_view("2025-01").unwrap();
    let rows = budgets::table_rows(&view);
    assert_eq!(rows[0][0], "[Unassigned]");
    assert_eq!(rows[1], vec!["  Cat1", "0.00", "40.00", "30.00", "10.00"]);
    assert_eq!(rows.last().unwrap()[0], "Total");
}

#[test]
fn global_db_flag_parses() {
    let matches =
        cli::build_cli().get_matches_from(["budgetbook", "--db", "/tmp/x.sqlite", "doctor"]);
    assert_eq!(
        matches.get_one::<String>("db").map(String::as_str),
        Some("/tmp/x.sqlite")
    );
}
