//! Core logic for the Folio portfolio content store.
//! Owns the data model, local persistence, editors and remote sync; hosts
//! (FFI, CLI) only translate to and from these types.

pub mod admin_access;
pub mod baseline;
pub mod db;
pub mod document;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod sync;

pub use admin_access::{AccessTrigger, AdminAccessDetector, KeyEvent};
pub use baseline::baseline_portfolio;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use document::{
    decode_portfolio_document, encode_portfolio_document, export_file_name, ImportError,
};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::portfolio::{
    Contact, Education, EmploymentType, EntryId, Experience, PersonalInfo, Portfolio,
    PortfolioValidationError, Proficiency, Project, ProjectCategory, ProjectStatus, Skill,
    SkillCategory,
};
pub use model::section::Section;
pub use service::onboarding::OnboardingFlags;
pub use service::portfolio_store::{PortfolioStore, StoreError, StoreResult};
pub use service::profile_editor::{ProfileDraft, ProfileEditor};
pub use service::project_editor::{
    DraftRejection, EditTarget, EditorError, ProjectEditor, ProjectStats, SaveOutcome,
};
pub use storage::{
    InMemoryKeyValueStore, KeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use sync::{
    GitHubConfig, GitHubContentsClient, RemoteDocument, RemoteDocumentStore, RemoteSync,
    SyncError, SyncResult,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
