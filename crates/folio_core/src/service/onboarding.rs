//! First-run onboarding flags.
//!
//! # Responsibility
//! - Decide whether the welcome flow should be shown.
//! - Record that the visitor finished or skipped it, and that data was
//!   customized through the admin panel.
//!
//! # Invariants
//! - Flags live in the same key-value medium as section overrides.
//! - Any stored value counts as "set"; only absence means unset.

use crate::storage::{KeyValueStore, StorageResult};
use log::warn;

pub const VISITED_KEY: &str = "portfolio-visited";
pub const CUSTOMIZED_KEY: &str = "portfolio-customized";
const FLAG_VALUE: &str = "true";

/// Onboarding flag accessor over a key-value medium.
pub struct OnboardingFlags<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> OnboardingFlags<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns true when neither flag is set.
    ///
    /// An unreadable medium hides the flow rather than showing it on every
    /// visit.
    pub fn should_show(&self) -> bool {
        match (self.is_set(VISITED_KEY), self.is_set(CUSTOMIZED_KEY)) {
            (Ok(visited), Ok(customized)) => !visited && !customized,
            (Err(err), _) | (_, Err(err)) => {
                warn!("event=onboarding_check module=onboarding status=error error={err}");
                false
            }
        }
    }

    pub fn has_visited(&self) -> StorageResult<bool> {
        self.is_set(VISITED_KEY)
    }

    /// Marks the flow as completed; the caller then opens the admin panel.
    pub fn complete(&self) -> StorageResult<()> {
        self.storage.set(VISITED_KEY, FLAG_VALUE)
    }

    /// Marks the flow as dismissed.
    pub fn skip(&self) -> StorageResult<()> {
        self.storage.set(VISITED_KEY, FLAG_VALUE)
    }

    fn is_set(&self, key: &str) -> StorageResult<bool> {
        Ok(self.storage.get(key)?.is_some())
    }
}

/// Set by the data store after every successful write.
pub(crate) fn mark_customized(storage: &impl KeyValueStore) -> StorageResult<()> {
    storage.set(CUSTOMIZED_KEY, FLAG_VALUE)
}

#[cfg(test)]
mod tests {
    use super::{OnboardingFlags, CUSTOMIZED_KEY};
    use crate::storage::InMemoryKeyValueStore;

    #[test]
    fn shows_on_first_visit_only() {
        let storage = InMemoryKeyValueStore::new();
        let flags = OnboardingFlags::new(&storage);
        assert!(flags.should_show());

        flags.skip().unwrap();
        assert!(!flags.should_show());
        assert!(flags.has_visited().unwrap());
    }

    #[test]
    fn customized_data_suppresses_flow() {
        let storage = InMemoryKeyValueStore::with_entries([(CUSTOMIZED_KEY, "true")]);
        let flags = OnboardingFlags::new(&storage);
        assert!(!flags.should_show());
        assert!(!flags.has_visited().unwrap());
    }

    #[test]
    fn unreadable_medium_hides_flow() {
        let storage = InMemoryKeyValueStore::new();
        storage.set_unavailable(true);
        assert!(!OnboardingFlags::new(&storage).should_show());
    }
}
