#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::memory::MemoryStore;
use super::*;
use crate::models::{BudgetRule, Expense, ExpenseCategory};

fn sample_expense() -> Expense {
    Expense {
        id: "abc".into(),
        name: "Coffee".into(),
        amount: dec!(4.50),
        category: ExpenseCategory::Dining,
        date: "2024-01-15".into(),
        notes: Some("oat milk".into()),
    }
}

// ── SqliteStore ───────────────────────────────────────────────

#[test]
fn test_sqlite_missing_key_is_none() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(store.get_raw("expenses").unwrap().is_none());
}

#[test]
fn test_sqlite_set_then_get() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.set_raw("k", "[1,2,3]").unwrap();
    assert_eq!(store.get_raw("k").unwrap().as_deref(), Some("[1,2,3]"));
}

#[test]
fn test_sqlite_set_overwrites() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.set_raw("k", "first").unwrap();
    store.set_raw("k", "second").unwrap();
    assert_eq!(store.get_raw("k").unwrap().as_deref(), Some("second"));
}

#[test]
fn test_sqlite_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.set_raw("budgets", "[]").unwrap();
    }
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.get_raw("budgets").unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_sqlite_reopen_does_not_rerun_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    SqliteStore::open(&path).unwrap();
    // Second open goes through the migration path on an existing file
    assert!(SqliteStore::open(&path).is_ok());
}

fn set_schema_version(path: &std::path::Path, sql: &str) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(sql).unwrap();
}

#[test]
fn test_sqlite_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    SqliteStore::open(&path).unwrap();
    set_schema_version(&path, "UPDATE schema_version SET version = 99;");

    let err = SqliteStore::open(&path).err().unwrap();
    assert!(format!("{err:#}").contains("newer than this build supports"));
}

#[test]
fn test_sqlite_unreadable_schema_version_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    SqliteStore::open(&path).unwrap();
    set_schema_version(&path, "UPDATE schema_version SET version = 'abc';");

    let err = SqliteStore::open(&path).err().unwrap();
    assert!(format!("{err:#}").contains("Failed to read schema version"));
}

#[test]
fn test_sqlite_missing_version_row_is_restored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.set_raw("expenses", "[]").unwrap();
    }
    set_schema_version(&path, "DELETE FROM schema_version;");

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.get_raw("expenses").unwrap().as_deref(), Some("[]"));
    let conn = rusqlite::Connection::open(&path).unwrap();
    let version: i32 = conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

// ── LocalStorage ──────────────────────────────────────────────

#[test]
fn test_local_storage_default_when_missing() {
    let mut storage = LocalStorage::new(Box::new(MemoryStore::default()));
    let expenses: Vec<Expense> = storage.get(EXPENSES_KEY).unwrap();
    assert!(expenses.is_empty());
}

#[test]
fn test_local_storage_roundtrip_typed() {
    let mut storage = LocalStorage::new(Box::new(SqliteStore::open_in_memory().unwrap()));
    let expenses = vec![sample_expense()];
    storage.set(EXPENSES_KEY, &expenses).unwrap();
    let back: Vec<Expense> = storage.get(EXPENSES_KEY).unwrap();
    assert_eq!(back, expenses);
}

#[test]
fn test_local_storage_writes_json_shape() {
    let mem = MemoryStore::default();
    let mut storage = LocalStorage::new(Box::new(mem.clone()));
    storage
        .set(BUDGETS_KEY, &vec![BudgetRule::new(ExpenseCategory::Housing, dec!(900))])
        .unwrap();
    assert_eq!(
        mem.raw(BUDGETS_KEY).as_deref(),
        Some(r#"[{"category":"Housing","monthlyLimit":900.0}]"#)
    );
}

#[test]
fn test_local_storage_reads_browser_shaped_json() {
    let mem = MemoryStore::default();
    mem.insert_raw(
        EXPENSES_KEY,
        r#"[{"id":"1","name":"Rent","amount":1200,"category":"Housing","date":"2024-01-01","notes":""},
            {"id":"2","name":"Bus","amount":2.5,"category":"Transport","date":"2024-01-03"}]"#,
    );
    let mut storage = LocalStorage::new(Box::new(mem));
    let expenses: Vec<Expense> = storage.get(EXPENSES_KEY).unwrap();
    assert_eq!(expenses.len(), 2);
    assert!(storage.backups().is_empty());
    assert_eq!(expenses[1].amount, dec!(2.5));
}

#[test]
fn test_local_storage_undecodable_reads_default_and_keeps_copy() {
    let mem = MemoryStore::default();
    let pets = r#"[{"category":"Pets","monthlyLimit":5}]"#;
    mem.insert_raw(EXPENSES_KEY, "{not json");
    mem.insert_raw(BUDGETS_KEY, pets);
    let mut storage = LocalStorage::new(Box::new(mem.clone()));
    let expenses: Vec<Expense> = storage.get(EXPENSES_KEY).unwrap();
    let budgets: Vec<BudgetRule> = storage.get(BUDGETS_KEY).unwrap();
    assert!(expenses.is_empty());
    assert!(budgets.is_empty());

    let backups = storage.backups().to_vec();
    assert_eq!(backups.len(), 2);
    assert!(backups[0].starts_with("expenses.corrupt-"));
    assert!(backups[1].starts_with("budgets.corrupt-"));
    assert_eq!(mem.raw(&backups[0]).as_deref(), Some("{not json"));
    assert_eq!(mem.raw(&backups[1]).as_deref(), Some(pets));
}

#[test]
fn test_local_storage_repeated_undecodable_reads_keep_distinct_copies() {
    let mem = MemoryStore::default();
    mem.insert_raw(EXPENSES_KEY, "{not json");
    let mut storage = LocalStorage::new(Box::new(mem.clone()));
    let _: Vec<Expense> = storage.get(EXPENSES_KEY).unwrap();
    let _: Vec<Expense> = storage.get(EXPENSES_KEY).unwrap();
    let backups = storage.backups().to_vec();
    assert_eq!(backups.len(), 2);
    assert_ne!(backups[0], backups[1]);
    for key in &backups {
        assert_eq!(mem.raw(key).as_deref(), Some("{not json"));
    }
}

#[test]
fn test_local_storage_undecodable_fails_when_copy_cannot_be_written() {
    let mem = MemoryStore::default();
    mem.insert_raw(EXPENSES_KEY, "{not json");
    mem.set_fail_writes(true);
    let mut storage = LocalStorage::new(Box::new(mem.clone()));
    assert!(storage.get::<Vec<Expense>>(EXPENSES_KEY).is_err());
    assert!(storage.backups().is_empty());
    assert_eq!(mem.raw(EXPENSES_KEY).as_deref(), Some("{not json"));
}

#[test]
fn test_local_storage_write_failure_propagates() {
    let mem = MemoryStore::default();
    mem.set_fail_writes(true);
    let mut storage = LocalStorage::new(Box::new(mem.clone()));
    assert!(storage.set(EXPENSES_KEY, &vec![sample_expense()]).is_err());
    assert!(mem.raw(EXPENSES_KEY).is_none());
}
