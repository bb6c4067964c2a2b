mod schema;
mod sqlite;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub(crate) use sqlite::SqliteStore;

pub(crate) const EXPENSES_KEY: &str = "expenses";
pub(crate) const BUDGETS_KEY: &str = "budgets";

/// Raw string storage underneath [`LocalStorage`]. Implementations only move
/// text around; encoding lives one layer up.
pub(crate) trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    fn set_raw(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Typed JSON access over any [`KeyValueStore`].
pub(crate) struct LocalStorage {
    backend: Box<dyn KeyValueStore>,
    backups: Vec<String>,
}

impl LocalStorage {
    pub(crate) fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            backups: Vec::new(),
        }
    }

    /// Missing keys read as `T::default()`. A value that no longer decodes
    /// is copied to a `<key>.corrupt-<timestamp>` entry before the default
    /// is returned, so the next write to `key` cannot destroy it. If the
    /// copy fails the read fails.
    pub(crate) fn get<T>(&mut self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.backend.get_raw(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                let backup = self.backup_raw(key, &raw)?;
                tracing::warn!(key, backup = %backup, error = %e, "stored value did not decode, moved aside");
                self.backups.push(backup);
                Ok(T::default())
            }
        }
    }

    /// Keys written by [`get`](Self::get) for values it could not decode.
    pub(crate) fn backups(&self) -> &[String] {
        &self.backups
    }

    fn backup_raw(&mut self, key: &str, raw: &str) -> Result<String> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let mut backup = format!("{key}.corrupt-{stamp}");
        let mut n = 1;
        while self.backend.get_raw(&backup)?.is_some() {
            n += 1;
            backup = format!("{key}.corrupt-{stamp}-{n}");
        }
        self.backend
            .set_raw(&backup, raw)
            .with_context(|| format!("Failed to back up undecodable value of '{key}'"))?;
        Ok(backup)
    }

    pub(crate) fn set<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to encode value for '{key}'"))?;
        self.backend.set_raw(key, &raw)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use anyhow::Result;

    use super::KeyValueStore;

    /// In-memory backend. Clones share the same map so a test can keep a
    /// handle while the ledger owns another.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryStore {
        pub(crate) entries: Rc<RefCell<HashMap<String, String>>>,
        pub(crate) fail_writes: Rc<RefCell<bool>>,
    }

    impl MemoryStore {
        pub(crate) fn raw(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }

        pub(crate) fn insert_raw(&self, key: &str, value: &str) {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }

        pub(crate) fn set_fail_writes(&self, fail: bool) {
            *self.fail_writes.borrow_mut() = fail;
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get_raw(&self, key: &str) -> Result<Option<String>> {
            Ok(self.raw(key))
        }

        fn set_raw(&mut self, key: &str, value: &str) -> Result<()> {
            if *self.fail_writes.borrow() {
                anyhow::bail!("write refused for '{key}'");
            }
            self.insert_raw(key, value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
