#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::{BudgetRule, Expense};
use crate::store::memory::MemoryStore;
use crate::store::LocalStorage;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn ledger() -> Ledger {
    Ledger::load(LocalStorage::new(Box::new(MemoryStore::default()))).unwrap()
}

fn seed(ledger: &mut Ledger, name: &str, amount: rust_decimal::Decimal, date: &str) -> String {
    let e = Expense::new(
        name.into(),
        amount,
        ExpenseCategory::Other,
        date.into(),
        None,
    );
    let id = e.id.clone();
    ledger.add_expense(e).unwrap();
    id
}

// ── Argument helpers ─────────────────────────────────────────

#[test]
fn test_positionals_skip_flag_values() {
    let a = args(&["Cafe", "latte", "--category", "Dining", "4.50", "--asc"]);
    assert_eq!(positionals(&a), vec!["Cafe", "latte", "4.50"]);
    assert_eq!(flag_value(&a, "--category"), Some("Dining"));
    assert_eq!(flag_value(&a, "--notes"), None);
    assert!(has_flag(&a, "--asc"));
}

#[test]
fn test_parse_add_multi_word_name() {
    let d = parse_add(&args(&[
        "Cafe", "latte", "4.50", "--category", "dining", "--date", "2024-03-02", "--notes",
        "with Sam",
    ]))
    .unwrap();
    assert_eq!(d.name, "Cafe latte");
    assert_eq!(d.amount, "4.50");
    assert_eq!(d.category, ExpenseCategory::Dining);
    assert_eq!(d.date, "2024-03-02");
    assert_eq!(d.notes, "with Sam");
}

#[test]
fn test_parse_add_errors() {
    assert!(parse_add(&args(&["4.50"])).is_err());
    assert!(parse_add(&args(&[])).is_err());
    assert!(parse_add(&args(&["Taxi", "12", "--category", "Pets"])).is_err());
    assert!(parse_add(&args(&["Taxi", "12", "--date", "03/02/2024"])).is_err());
}

#[test]
fn test_parse_sort() {
    let s = parse_sort(&args(&[])).unwrap();
    assert_eq!(s, SortState::default());

    let s = parse_sort(&args(&["--sort", "amount", "--asc"])).unwrap();
    assert_eq!(s.key, SortKey::Amount);
    assert_eq!(s.direction, SortDirection::Asc);

    assert!(parse_sort(&args(&["--sort", "size"])).is_err());
}

#[test]
fn test_parse_month() {
    assert_eq!(parse_month("2024-3").unwrap(), "2024-03");
    assert_eq!(parse_month("2024-12").unwrap(), "2024-12");
    assert!(parse_month("2024-13").is_err());
    assert!(parse_month("March").is_err());
}

#[test]
fn test_shellexpand() {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    assert_eq!(shellexpand("~/out.csv"), format!("{home}/out.csv"));
    assert_eq!(shellexpand("/tmp/out.csv"), "/tmp/out.csv");
}

// ── Commands ─────────────────────────────────────────────────

#[test]
fn test_add_persists() {
    let mut l = ledger();
    as_cli(
        &args(&["expensedash", "add", "Bus", "pass", "$45", "--category", "Transport"]),
        &mut l,
    )
    .unwrap();
    assert_eq!(l.expenses().len(), 1);
    assert_eq!(l.expenses()[0].name, "Bus pass");
    assert_eq!(l.expenses()[0].amount, dec!(45));
    assert_eq!(l.expenses()[0].category, ExpenseCategory::Transport);
}

#[test]
fn test_add_rejects_zero_amount() {
    let mut l = ledger();
    let err = as_cli(&args(&["expensedash", "add", "Bus", "0"]), &mut l).unwrap_err();
    assert_eq!(err.to_string(), "Amount must be greater than zero");
    assert!(l.expenses().is_empty());
}

#[test]
fn test_delete_by_prefix() {
    let mut l = ledger();
    let id = seed(&mut l, "Rent", dec!(900), "2024-01-01");
    as_cli(&args(&["expensedash", "delete", &id[..8]]), &mut l).unwrap();
    assert!(l.expenses().is_empty());
}

#[test]
fn test_delete_unknown_fails() {
    let mut l = ledger();
    seed(&mut l, "Rent", dec!(900), "2024-01-01");
    assert!(as_cli(&args(&["expensedash", "delete", "zzzz"]), &mut l).is_err());
    assert_eq!(l.expenses().len(), 1);
}

#[test]
fn test_budget_and_unbudget() {
    let mut l = ledger();
    as_cli(&args(&["expensedash", "budget", "Dining", "250"]), &mut l).unwrap();
    as_cli(&args(&["expensedash", "budget", "Dining", "-10"]), &mut l).unwrap();
    as_cli(&args(&["expensedash", "budget", "Health", "60"]), &mut l).unwrap();
    assert_eq!(
        l.budgets(),
        &[
            BudgetRule::new(ExpenseCategory::Dining, dec!(0)),
            BudgetRule::new(ExpenseCategory::Health, dec!(60)),
        ]
    );

    as_cli(&args(&["expensedash", "unbudget", "dining"]), &mut l).unwrap();
    assert_eq!(
        l.budgets(),
        &[BudgetRule::new(ExpenseCategory::Health, dec!(60))]
    );
    // Removing a missing budget is not an error
    as_cli(&args(&["expensedash", "unbudget", "Dining"]), &mut l).unwrap();
}

#[test]
fn test_read_only_commands_succeed() {
    let mut l = ledger();
    seed(&mut l, "Rent", dec!(900), "2024-01-01");
    for cmd in [
        vec!["expensedash", "list", "--sort", "name", "--asc"],
        vec!["expensedash", "months"],
        vec!["expensedash", "summary", "2024-01"],
        vec!["expensedash", "budgets"],
        vec!["expensedash", "version"],
    ] {
        as_cli(&args(&cmd), &mut l).unwrap();
    }
    assert!(as_cli(&args(&["expensedash", "summary", "2024-13"]), &mut l).is_err());
}

#[test]
fn test_export_month() {
    let mut l = ledger();
    seed(&mut l, "Jan", dec!(10), "2024-01-05");
    seed(&mut l, "Feb", dec!(20), "2024-02-05");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jan.csv");
    let path_str = path.display().to_string();

    as_cli(
        &args(&["expensedash", "export", &path_str, "--month", "2024-01"]),
        &mut l,
    )
    .unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains(",Jan,"));
}

#[test]
fn test_unknown_command() {
    let mut l = ledger();
    let err = as_cli(&args(&["expensedash", "frobnicate"]), &mut l).unwrap_err();
    assert_eq!(err.to_string(), "Unknown command: frobnicate");
}
