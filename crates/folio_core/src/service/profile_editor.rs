//! Personal info and contact form editor.
//!
//! Both records are edited as one form and saved together.

use crate::model::portfolio::{Contact, PersonalInfo};
use crate::service::portfolio_store::{PortfolioStore, StoreResult};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub personal_info: PersonalInfo,
    pub contact: Contact,
}

#[derive(Debug, Clone)]
pub struct ProfileEditor {
    committed: ProfileDraft,
    draft: Option<ProfileDraft>,
}

impl ProfileEditor {
    pub fn new(personal_info: PersonalInfo, contact: Contact) -> Self {
        Self {
            committed: ProfileDraft {
                personal_info,
                contact,
            },
            draft: None,
        }
    }

    pub fn from_store<S: KeyValueStore>(store: &PortfolioStore<S>) -> Self {
        let data = store.data();
        Self::new(data.personal_info.clone(), data.contact.clone())
    }

    pub fn committed(&self) -> &ProfileDraft {
        &self.committed
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Opens the form with a copy of the committed values, or returns the
    /// draft already open.
    pub fn begin_edit(&mut self) -> &mut ProfileDraft {
        let committed = &self.committed;
        self.draft.get_or_insert_with(|| committed.clone())
    }

    pub fn draft_mut(&mut self) -> Option<&mut ProfileDraft> {
        self.draft.as_mut()
    }

    /// Persists both records through `store` and closes the form.
    ///
    /// Returns `Ok(false)` when no form is open. When either write fails the
    /// form stays open with its draft; a failed contact write leaves the
    /// personal info already persisted.
    pub fn save<S: KeyValueStore>(&mut self, store: &mut PortfolioStore<S>) -> StoreResult<bool> {
        let Some(draft) = self.draft.as_ref() else {
            return Ok(false);
        };
        store.update_personal_info(draft.personal_info.clone())?;
        store.update_contact(draft.contact.clone())?;
        if let Some(draft) = self.draft.take() {
            self.committed = draft;
        }
        Ok(true)
    }

    /// Closes the form and drops the draft.
    pub fn cancel(&mut self) {
        self.draft = None;
    }
}
