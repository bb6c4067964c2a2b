#![allow(clippy::unwrap_used)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;
use crate::ledger::ExpenseDraft;
use crate::store::memory::MemoryStore;
use crate::store::LocalStorage;

fn setup() -> (App, Ledger, MemoryStore) {
    let mem = MemoryStore::default();
    let ledger = Ledger::load(LocalStorage::new(Box::new(mem.clone()))).unwrap();
    let app = App::new(&ledger);
    (app, ledger, mem)
}

fn press(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn filled_form() -> ExpenseDraft {
    ExpenseDraft {
        name: "Groceries run".into(),
        amount: "54.20".into(),
        category: ExpenseCategory::Groceries,
        date: "2024-02-10".into(),
        notes: String::new(),
    }
}

#[test]
fn test_failed_save_returns_error_and_keeps_form() {
    let (mut app, mut ledger, mem) = setup();
    app.screen = Screen::AddExpense;
    app.form = filled_form();
    mem.set_fail_writes(true);

    assert!(handle_key(press('s'), &mut app, &mut ledger).is_err());
    assert_eq!(app.form.name, "Groceries run");
    assert_eq!(app.form.amount, "54.20");
    assert!(ledger.expenses().is_empty());

    mem.set_fail_writes(false);
    handle_key(press('s'), &mut app, &mut ledger).unwrap();
    assert_eq!(ledger.expenses().len(), 1);
    assert!(app.form.name.is_empty());
    assert!(app.status_message.starts_with("Added: Groceries run"));
}

#[test]
fn test_invalid_form_is_not_an_error() {
    let (mut app, mut ledger, _) = setup();
    app.screen = Screen::AddExpense;
    handle_key(press('s'), &mut app, &mut ledger).unwrap();
    assert!(app.status_message.starts_with("Cannot save:"));
    assert!(ledger.expenses().is_empty());
}

#[test]
fn test_failed_delete_returns_error_and_closes_prompt() {
    let (mut app, mut ledger, mem) = setup();
    let expense = filled_form().submit().unwrap();
    let id = expense.id.clone();
    ledger.add_expense(expense).unwrap();

    app.screen = Screen::Expenses;
    app.pending_action = Some(PendingAction::DeleteExpense {
        id: id.clone(),
        name: "Groceries run".into(),
    });
    app.input_mode = InputMode::Confirm;
    app.confirm_message = "Delete 'Groceries run'? (y/n)".into();
    mem.set_fail_writes(true);

    assert!(handle_key(press('y'), &mut app, &mut ledger).is_err());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
    assert!(app.confirm_message.is_empty());
    assert!(ledger.find_expense(&id).is_some());
}

#[test]
fn test_confirmed_delete_reports_name() {
    let (mut app, mut ledger, _) = setup();
    let expense = filled_form().submit().unwrap();
    let id = expense.id.clone();
    ledger.add_expense(expense).unwrap();

    app.pending_action = Some(PendingAction::DeleteExpense {
        id,
        name: "Groceries run".into(),
    });
    app.input_mode = InputMode::Confirm;

    handle_key(press('y'), &mut app, &mut ledger).unwrap();
    assert!(ledger.expenses().is_empty());
    assert_eq!(app.status_message, "Deleted: Groceries run");
}

#[test]
fn test_help_overlay_swallows_next_key() {
    let (mut app, mut ledger, _) = setup();
    app.show_help = true;
    handle_key(press(':'), &mut app, &mut ledger).unwrap();
    assert!(!app.show_help);
    assert_eq!(app.input_mode, InputMode::Normal);
}
