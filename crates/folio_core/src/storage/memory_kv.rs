//! In-memory key-value medium.
//!
//! Used as a substitute for the persisted medium in tests and previews. Can
//! simulate a full or unreachable medium.

use super::{validate_key, KeyValueStore, StorageError, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
    /// Remaining successful `set` calls; `None` means unlimited.
    write_budget: Cell<Option<usize>>,
    unavailable: Cell<bool>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a medium pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        store
    }

    /// Lets `count` more writes succeed, then rejects every write with
    /// `QuotaExceeded`.
    pub fn fail_writes_after(&self, count: usize) {
        self.write_budget.set(Some(count));
    }

    /// Removes any write limit.
    pub fn allow_writes(&self) {
        self.write_budget.set(None);
    }

    /// Makes every operation fail with `Unavailable` while `value` is true.
    pub fn set_unavailable(&self, value: bool) {
        self.unavailable.set(value);
    }

    /// Returns a copy of all stored entries.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.unavailable.get() {
            return Err(StorageError::Unavailable(
                "in-memory medium disabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        self.ensure_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.ensure_available()?;
        match self.write_budget.get() {
            Some(0) => {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                })
            }
            Some(remaining) => self.write_budget.set(Some(remaining - 1)),
            None => {}
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.ensure_available()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryKeyValueStore;
    use crate::storage::{KeyValueStore, StorageError};

    #[test]
    fn write_budget_rejects_after_limit() {
        let store = InMemoryKeyValueStore::new();
        store.fail_writes_after(1);

        store.set("a", "1").unwrap();
        let err = store.set("b", "2").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { ref key } if key == "b"));
        assert!(!store.contains_key("b"));

        store.allow_writes();
        store.set("b", "2").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unavailable_medium_fails_reads() {
        let store = InMemoryKeyValueStore::with_entries([("a", "1")]);
        store.set_unavailable(true);
        assert!(matches!(
            store.get("a").unwrap_err(),
            StorageError::Unavailable(_)
        ));
        store.set_unavailable(false);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
