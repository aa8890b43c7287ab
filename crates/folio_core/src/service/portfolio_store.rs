//! Local data store adapter.
//!
//! # Responsibility
//! - Reconcile the baseline aggregate with per-section persisted overrides.
//! - Expose read/update/import/export/reset to UI-facing callers.
//!
//! # Invariants
//! - Collections are replaced by their override; single records are
//!   shallow-merged field by field over the baseline.
//! - A malformed override, or a collection override with blank or duplicate
//!   ids, never blocks loading; baseline wins for that section.
//! - In-memory state changes only after the matching write succeeded.
//! - Import writes sections one by one; a failed write leaves earlier
//!   sections persisted (no rollback) and in-memory state untouched.
//! - Reset removes every override and restores the exact baseline.

use crate::baseline::baseline_portfolio;
use crate::document::{
    decode_portfolio_document, encode_portfolio_document, overlay_record, ImportError,
};
use crate::model::portfolio::{
    ensure_unique_ids, Contact, Education, Experience, PersonalInfo, Portfolio,
    PortfolioValidationError, Project, Skill,
};
use crate::model::section::Section;
use crate::service::onboarding::mark_customized;
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store adapter error for write paths.
#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Serialize(serde_json::Error),
    Validation(PortfolioValidationError),
    Import(ImportError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize portfolio data: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Import(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<PortfolioValidationError> for StoreError {
    fn from(value: PortfolioValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ImportError> for StoreError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

/// Portfolio data store over an injected key-value medium.
pub struct PortfolioStore<S: KeyValueStore> {
    storage: S,
    baseline: Portfolio,
    data: Portfolio,
    is_loading: bool,
}

impl<S: KeyValueStore> PortfolioStore<S> {
    /// Creates a store that serves `baseline` until `load` runs.
    pub fn new(storage: S, baseline: Portfolio) -> Self {
        Self {
            storage,
            data: baseline.clone(),
            baseline,
            is_loading: true,
        }
    }

    /// Creates a store over the embedded baseline dataset.
    pub fn with_default_baseline(storage: S) -> Self {
        Self::new(storage, baseline_portfolio())
    }

    /// Creates a store and immediately loads persisted overrides.
    pub fn open(storage: S) -> Self {
        let mut store = Self::with_default_baseline(storage);
        store.load();
        store
    }

    /// Current working aggregate.
    pub fn data(&self) -> &Portfolio {
        &self.data
    }

    pub fn baseline(&self) -> &Portfolio {
        &self.baseline
    }

    /// True until the first `load` completes.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Rebuilds the working aggregate from baseline plus persisted overrides.
    ///
    /// # Side effects
    /// - Emits `store_load` events; skipped sections are logged at warn level.
    pub fn load(&mut self) {
        info!("event=store_load module=store status=start");
        let mut loaded = self.baseline.clone();
        let mut applied = 0usize;

        for section in Section::ALL {
            let raw = match self.storage.get(section.storage_key()) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(err) => {
                    warn!(
                        "event=override_read module=store status=skip section={section} error={err}"
                    );
                    continue;
                }
            };
            match apply_override(&mut loaded, section, &raw) {
                Ok(()) => applied += 1,
                Err(err) => warn!(
                    "event=override_decode module=store status=skip section={section} error={err}"
                ),
            }
        }

        self.data = loaded;
        self.is_loading = false;
        info!("event=store_load module=store status=ok overrides_applied={applied}");
    }

    pub fn update_projects(&mut self, projects: Vec<Project>) -> StoreResult<()> {
        ensure_unique_ids(Section::Projects, projects.iter().map(|p| p.id.as_str()))?;
        self.persist(Section::Projects, &projects)?;
        self.data.projects = projects;
        Ok(())
    }

    pub fn update_personal_info(&mut self, personal_info: PersonalInfo) -> StoreResult<()> {
        self.persist(Section::PersonalInfo, &personal_info)?;
        self.data.personal_info = personal_info;
        Ok(())
    }

    pub fn update_contact(&mut self, contact: Contact) -> StoreResult<()> {
        self.persist(Section::Contact, &contact)?;
        self.data.contact = contact;
        Ok(())
    }

    pub fn update_skills(&mut self, skills: Vec<Skill>) -> StoreResult<()> {
        ensure_unique_ids(Section::Skills, skills.iter().map(|s| s.id.as_str()))?;
        self.persist(Section::Skills, &skills)?;
        self.data.skills = skills;
        Ok(())
    }

    pub fn update_experience(&mut self, experience: Vec<Experience>) -> StoreResult<()> {
        ensure_unique_ids(
            Section::Experience,
            experience.iter().map(|e| e.id.as_str()),
        )?;
        self.persist(Section::Experience, &experience)?;
        self.data.experience = experience;
        Ok(())
    }

    pub fn update_education(&mut self, education: Vec<Education>) -> StoreResult<()> {
        ensure_unique_ids(Section::Education, education.iter().map(|e| e.id.as_str()))?;
        self.persist(Section::Education, &education)?;
        self.data.education = education;
        Ok(())
    }

    /// Returns the current aggregate as a read-only snapshot.
    pub fn export_all(&self) -> &Portfolio {
        &self.data
    }

    /// Renders the current aggregate as the export JSON document.
    pub fn export_document(&self) -> StoreResult<String> {
        Ok(encode_portfolio_document(&self.data)?)
    }

    /// Persists every section of `portfolio` and replaces in-memory state.
    ///
    /// # Errors
    /// - `Validation` before any write when identifiers are invalid.
    /// - `Storage`/`Serialize` on the first failing section; sections written
    ///   before it stay persisted and in-memory state is unchanged.
    pub fn import_all(&mut self, portfolio: Portfolio) -> StoreResult<()> {
        info!("event=store_import module=store status=start");
        portfolio.validate()?;

        for section in Section::ALL {
            let written = section_json(&portfolio, section)
                .map_err(StoreError::from)
                .and_then(|raw| {
                    self.storage
                        .set(section.storage_key(), &raw)
                        .map_err(StoreError::from)
                });
            if let Err(err) = written {
                error!(
                    "event=store_import module=store status=error section={section} error={err}"
                );
                return Err(err);
            }
        }

        self.data = portfolio;
        self.note_customized();
        info!("event=store_import module=store status=ok");
        Ok(())
    }

    /// Decodes an aggregate document and imports it.
    ///
    /// A rejected document leaves both the medium and memory untouched.
    pub fn import_document(&mut self, text: &str) -> StoreResult<()> {
        let portfolio = decode_portfolio_document(text).map_err(|err| {
            warn!("event=store_import module=store status=rejected error={err}");
            StoreError::Import(err)
        })?;
        self.import_all(portfolio)
    }

    /// Removes all six overrides and restores the baseline.
    ///
    /// Onboarding flags are left alone. On a failed removal the in-memory
    /// state is kept.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        for section in Section::ALL {
            if let Err(err) = self.storage.remove(section.storage_key()) {
                error!("event=store_reset module=store status=error section={section} error={err}");
                return Err(err.into());
            }
        }
        self.data = self.baseline.clone();
        info!("event=store_reset module=store status=ok");
        Ok(())
    }

    fn persist<T: Serialize>(&self, section: Section, value: &T) -> StoreResult<()> {
        let result = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|raw| {
                self.storage
                    .set(section.storage_key(), &raw)
                    .map_err(StoreError::from)
            });
        match &result {
            Ok(()) => {
                debug!("event=section_save module=store status=ok section={section}");
                self.note_customized();
            }
            Err(err) => {
                error!("event=section_save module=store status=error section={section} error={err}");
            }
        }
        result
    }

    fn note_customized(&self) {
        if let Err(err) = mark_customized(&self.storage) {
            warn!("event=mark_customized module=store status=error error={err}");
        }
    }
}

/// Reason a persisted override was skipped during `load`.
#[derive(Debug)]
enum OverrideError {
    Decode(serde_json::Error),
    Invalid(PortfolioValidationError),
}

impl Display for OverrideError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "{err}"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl From<serde_json::Error> for OverrideError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

impl From<PortfolioValidationError> for OverrideError {
    fn from(value: PortfolioValidationError) -> Self {
        Self::Invalid(value)
    }
}

fn apply_override(
    target: &mut Portfolio,
    section: Section,
    raw: &str,
) -> Result<(), OverrideError> {
    match section {
        Section::Projects => {
            let projects: Vec<Project> = parse(raw)?;
            ensure_unique_ids(section, projects.iter().map(|p| p.id.as_str()))?;
            target.projects = projects;
        }
        Section::PersonalInfo => target.personal_info = overlay_record(&target.personal_info, raw)?,
        Section::Contact => target.contact = overlay_record(&target.contact, raw)?,
        Section::Skills => {
            let skills: Vec<Skill> = parse(raw)?;
            ensure_unique_ids(section, skills.iter().map(|s| s.id.as_str()))?;
            target.skills = skills;
        }
        Section::Experience => {
            let experience: Vec<Experience> = parse(raw)?;
            ensure_unique_ids(section, experience.iter().map(|e| e.id.as_str()))?;
            target.experience = experience;
        }
        Section::Education => {
            let education: Vec<Education> = parse(raw)?;
            ensure_unique_ids(section, education.iter().map(|e| e.id.as_str()))?;
            target.education = education;
        }
    }
    Ok(())
}

fn parse<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
    serde_json::from_str(raw)
}

fn section_json(portfolio: &Portfolio, section: Section) -> serde_json::Result<String> {
    match section {
        Section::Projects => serde_json::to_string(&portfolio.projects),
        Section::PersonalInfo => serde_json::to_string(&portfolio.personal_info),
        Section::Contact => serde_json::to_string(&portfolio.contact),
        Section::Skills => serde_json::to_string(&portfolio.skills),
        Section::Experience => serde_json::to_string(&portfolio.experience),
        Section::Education => serde_json::to_string(&portfolio.education),
    }
}
