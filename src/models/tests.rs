#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn make_expense(date: &str, notes: Option<&str>) -> Expense {
    Expense {
        id: "e1".into(),
        name: "Weekly Shop".into(),
        amount: dec!(42.50),
        category: ExpenseCategory::Groceries,
        date: date.into(),
        notes: notes.map(String::from),
    }
}

// ── ExpenseCategory ───────────────────────────────────────────

#[test]
fn test_category_parse() {
    assert_eq!(ExpenseCategory::parse("groceries"), Some(ExpenseCategory::Groceries));
    assert_eq!(ExpenseCategory::parse("DINING"), Some(ExpenseCategory::Dining));
    assert_eq!(ExpenseCategory::parse("  Health "), Some(ExpenseCategory::Health));
    assert_eq!(ExpenseCategory::parse("Food"), None);
    assert_eq!(ExpenseCategory::parse(""), None);
}

#[test]
fn test_category_roundtrip() {
    for c in ExpenseCategory::all() {
        let s = c.as_str();
        assert_eq!(ExpenseCategory::parse(s), Some(*c), "Roundtrip failed for {s}");
    }
}

#[test]
fn test_category_all_order() {
    let all = ExpenseCategory::all();
    assert_eq!(all.len(), 10);
    assert_eq!(all[0], ExpenseCategory::Housing);
    assert_eq!(all[9], ExpenseCategory::Other);
}

#[test]
fn test_category_default_is_other() {
    assert_eq!(ExpenseCategory::default(), ExpenseCategory::Other);
}

#[test]
fn test_category_cycle_wraps() {
    assert_eq!(ExpenseCategory::Other.next(), ExpenseCategory::Housing);
    assert_eq!(ExpenseCategory::Housing.prev(), ExpenseCategory::Other);
    assert_eq!(ExpenseCategory::Housing.next(), ExpenseCategory::Utilities);
}

#[test]
fn test_category_serializes_as_label() {
    let json = serde_json::to_string(&ExpenseCategory::Entertainment).unwrap();
    assert_eq!(json, "\"Entertainment\"");
    let back: ExpenseCategory = serde_json::from_str("\"Savings\"").unwrap();
    assert_eq!(back, ExpenseCategory::Savings);
}

#[test]
fn test_category_rejects_unknown_label() {
    assert!(serde_json::from_str::<ExpenseCategory>("\"Pets\"").is_err());
}

// ── Expense ───────────────────────────────────────────────────

#[test]
fn test_expense_new_generates_unique_ids() {
    let a = Expense::new("A".into(), dec!(1), ExpenseCategory::Other, "2024-01-01".into(), None);
    let b = Expense::new("B".into(), dec!(1), ExpenseCategory::Other, "2024-01-01".into(), None);
    assert!(!a.id.is_empty());
    assert_ne!(a.id, b.id);
}

#[test]
fn test_month_key() {
    assert_eq!(make_expense("2024-03-09", None).month_key(), "2024-03");
    assert_eq!(make_expense("2024-3", None).month_key(), "2024-3");
    assert_eq!(make_expense("", None).month_key(), "");
}

#[test]
fn test_parsed_date() {
    assert_eq!(
        make_expense("2024-02-29", None).parsed_date(),
        NaiveDate::from_ymd_opt(2024, 2, 29)
    );
    assert_eq!(
        make_expense("2024-05-01T10:30:00Z", None).parsed_date(),
        NaiveDate::from_ymd_opt(2024, 5, 1)
    );
    assert!(make_expense("2023-02-29", None).parsed_date().is_none());
    assert!(make_expense("not a date", None).parsed_date().is_none());
}

#[test]
fn test_matches_search_name_and_notes() {
    let e = make_expense("2024-01-01", Some("Farmers Market"));
    assert!(e.matches_search("weekly"));
    assert!(e.matches_search("market"));
    assert!(e.matches_search(""));
    assert!(!e.matches_search("rent"));
}

#[test]
fn test_expense_json_shape() {
    let e = make_expense("2024-01-15", None);
    let value: serde_json::Value = serde_json::to_value(&e).unwrap();
    assert_eq!(value["id"], "e1");
    assert_eq!(value["category"], "Groceries");
    assert_eq!(value["date"], "2024-01-15");
    assert_eq!(value["amount"].as_f64(), Some(42.5));
    assert!(value.get("notes").is_none());
}

#[test]
fn test_expense_from_json_numbers() {
    let json = r#"{"id":"x","name":"Rent","amount":1200,"category":"Housing","date":"2024-01-01","notes":""}"#;
    let e: Expense = serde_json::from_str(json).unwrap();
    assert_eq!(e.amount, dec!(1200));
    assert_eq!(e.notes.as_deref(), Some(""));

    let json = r#"{"id":"y","name":"Bus","amount":2.75,"category":"Transport","date":"2024-01-02"}"#;
    let e: Expense = serde_json::from_str(json).unwrap();
    assert_eq!(e.amount, dec!(2.75));
    assert!(e.notes.is_none());
}

// ── BudgetRule ────────────────────────────────────────────────

#[test]
fn test_budget_rule_coerces_negative_limit() {
    let rule = BudgetRule::new(ExpenseCategory::Dining, dec!(-20));
    assert_eq!(rule.monthly_limit, Decimal::ZERO);
    let rule = BudgetRule::new(ExpenseCategory::Dining, dec!(150));
    assert_eq!(rule.monthly_limit, dec!(150));
}

#[test]
fn test_budget_rule_json_shape() {
    let rule = BudgetRule::new(ExpenseCategory::Groceries, dec!(100));
    let json = serde_json::to_string(&rule).unwrap();
    assert_eq!(json, r#"{"category":"Groceries","monthlyLimit":100.0}"#);
    let back: BudgetRule = serde_json::from_str(r#"{"category":"Groceries","monthlyLimit":100}"#).unwrap();
    assert_eq!(back, rule);
}

#[test]
fn test_budget_rule_find() {
    let rules = vec![
        BudgetRule::new(ExpenseCategory::Housing, dec!(1000)),
        BudgetRule::new(ExpenseCategory::Dining, dec!(200)),
    ];
    assert_eq!(
        BudgetRule::find(&rules, ExpenseCategory::Dining).map(|r| r.monthly_limit),
        Some(dec!(200))
    );
    assert!(BudgetRule::find(&rules, ExpenseCategory::Health).is_none());
}
