//! FFI use-case API for the Flutter admin shell.
//!
//! # Responsibility
//! - Expose portfolio use-cases (load, edit, import/export, reset,
//!   onboarding, admin access) to Dart via FRB.
//! - Translate core errors into envelopes with UI-ready messages.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the store, performs one use-case and drops it.
//! - Aggregate and record payloads travel as the export JSON shape.

use chrono::{Local, Utc};
use folio_core::{
    core_version as core_version_inner, encode_portfolio_document, export_file_name,
    init_logging as init_logging_inner, open_db, ping as ping_inner, AccessTrigger,
    AdminAccessDetector, Contact, ImportError, KeyEvent, OnboardingFlags, PersonalInfo,
    PortfolioStore, ProfileDraft, ProfileEditor, Project, ProjectEditor, SaveOutcome,
    SqliteKeyValueStore, StoreError,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

const DB_FILE_NAME: &str = "folio_store.sqlite3";
const DB_PATH_ENV: &str = "FOLIO_DB_PATH";
const SAVE_FAILED_MESSAGE: &str = "Error saving changes. Please try again.";

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static ADMIN_DETECTOR: OnceLock<Mutex<AdminAccessDetector>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive); empty
///   selects the build default (`debug` or `info`).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioActionResponse {
    pub ok: bool,
    /// Identifier of the affected entry, when there is one.
    pub entry_id: Option<String>,
    /// Human-readable message for banners/alerts.
    pub message: String,
}

impl PortfolioActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            entry_id: None,
            message: message.into(),
        }
    }

    fn success_with_id(message: impl Into<String>, entry_id: String) -> Self {
        Self {
            entry_id: Some(entry_id),
            ..Self::success(message)
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entry_id: None,
            message: message.into(),
        }
    }
}

/// Aggregate payload envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioDataResponse {
    pub ok: bool,
    /// Aggregate as pretty JSON; empty on failure.
    pub json: String,
    pub message: String,
}

/// Export envelope: the suggested file name and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioExportResponse {
    pub ok: bool,
    pub file_name: String,
    pub content: String,
    pub message: String,
}

/// Loads the effective aggregate (baseline plus overrides).
#[flutter_rust_bridge::frb(sync)]
pub fn portfolio_load() -> PortfolioDataResponse {
    load_at(&resolve_db_path())
}

/// Creates or replaces one project.
///
/// `project_json` uses the export shape for a single project. A blank `id`
/// creates a new project with a generated id.
#[flutter_rust_bridge::frb(sync)]
pub fn project_save(project_json: String) -> PortfolioActionResponse {
    save_project_at(&resolve_db_path(), &project_json)
}

/// Deletes one project. Confirmation is the caller's responsibility.
#[flutter_rust_bridge::frb(sync)]
pub fn project_delete(project_id: String) -> PortfolioActionResponse {
    delete_project_at(&resolve_db_path(), project_id.trim())
}

/// Saves personal info and contact together.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_save(personal_info_json: String, contact_json: String) -> PortfolioActionResponse {
    save_profile_at(&resolve_db_path(), &personal_info_json, &contact_json)
}

/// Renders the export document named for today's local date.
#[flutter_rust_bridge::frb(sync)]
pub fn portfolio_export() -> PortfolioExportResponse {
    export_at(&resolve_db_path())
}

/// Imports a full aggregate document.
#[flutter_rust_bridge::frb(sync)]
pub fn portfolio_import(content: String) -> PortfolioActionResponse {
    import_at(&resolve_db_path(), &content)
}

/// Drops every override and restores the shipped data.
#[flutter_rust_bridge::frb(sync)]
pub fn portfolio_reset() -> PortfolioActionResponse {
    reset_at(&resolve_db_path())
}

/// Whether the first-visit welcome flow should be shown.
///
/// Returns false when the store cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_should_show() -> bool {
    with_flags(&resolve_db_path(), |flags| Ok(flags.should_show())).unwrap_or(false)
}

/// Records the welcome flow as finished (`skipped = false`) or dismissed.
#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_finish(skipped: bool) -> PortfolioActionResponse {
    let result = with_flags(&resolve_db_path(), |flags| {
        let written = if skipped { flags.skip() } else { flags.complete() };
        written.map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => PortfolioActionResponse::success("Onboarding recorded."),
        Err(err) => PortfolioActionResponse::failure(format!("onboarding_finish failed: {err}")),
    }
}

/// Feeds one key event to the admin-access detector.
///
/// Returns `shortcut`, `magic_word`, or empty string when nothing triggered.
#[flutter_rust_bridge::frb(sync)]
pub fn admin_key_event(key: String, ctrl: bool, meta: bool, shift: bool) -> String {
    let detector = ADMIN_DETECTOR.get_or_init(|| Mutex::new(AdminAccessDetector::new()));
    let mut detector = detector
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let event = KeyEvent {
        key,
        ctrl,
        meta,
        shift,
    };
    trigger_label(detector.on_key(&event, Instant::now())).to_string()
}

fn trigger_label(trigger: Option<AccessTrigger>) -> &'static str {
    match trigger {
        Some(AccessTrigger::Shortcut) => "shortcut",
        Some(AccessTrigger::MagicWord) => "magic_word",
        None => "",
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    db_path: &Path,
    f: impl FnOnce(&mut PortfolioStore<SqliteKeyValueStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("store open failed: {err}"))?;
    let mut store = PortfolioStore::open(SqliteKeyValueStore::new(&conn));
    f(&mut store)
}

fn with_flags<T>(
    db_path: &Path,
    f: impl FnOnce(&OnboardingFlags<SqliteKeyValueStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("store open failed: {err}"))?;
    let flags = OnboardingFlags::new(SqliteKeyValueStore::new(&conn));
    f(&flags)
}

fn load_at(db_path: &Path) -> PortfolioDataResponse {
    let result = with_store(db_path, |store| {
        encode_portfolio_document(store.data()).map_err(|err| err.to_string())
    });
    match result {
        Ok(json) => PortfolioDataResponse {
            ok: true,
            json,
            message: "Portfolio loaded.".to_string(),
        },
        Err(err) => PortfolioDataResponse {
            ok: false,
            json: String::new(),
            message: format!("portfolio_load failed: {err}"),
        },
    }
}

fn save_project_at(db_path: &Path, project_json: &str) -> PortfolioActionResponse {
    let mut incoming: Project = match serde_json::from_str(project_json) {
        Ok(project) => project,
        Err(err) => return PortfolioActionResponse::failure(format!("invalid project: {err}")),
    };

    let result = with_store(db_path, |store| {
        let mut editor = ProjectEditor::from_store(store);
        let draft = if incoming.id.trim().is_empty() {
            let seeded = editor.begin_add(Utc::now());
            incoming.id = seeded.id.clone();
            if incoming.created_date.trim().is_empty() {
                incoming.created_date = seeded.created_date.clone();
            }
            seeded
        } else {
            editor
                .begin_edit(&incoming.id)
                .map_err(|err| err.to_string())?
        };
        *draft = incoming;

        match editor.save().map_err(|err| err.to_string())? {
            SaveOutcome::Saved { id, .. } => {
                editor.commit(store).map_err(|err| log_write_failure(&err))?;
                Ok(Ok(id))
            }
            SaveOutcome::Discarded(rejection) => Ok(Err(rejection.to_string())),
        }
    });

    match result {
        Ok(Ok(id)) => PortfolioActionResponse::success_with_id("Project saved.", id),
        Ok(Err(rejection)) => PortfolioActionResponse::failure(rejection),
        Err(err) => PortfolioActionResponse::failure(err),
    }
}

fn delete_project_at(db_path: &Path, project_id: &str) -> PortfolioActionResponse {
    let result = with_store(db_path, |store| {
        let mut editor = ProjectEditor::from_store(store);
        editor
            .delete(project_id, |_| true)
            .map_err(|err| err.to_string())?;
        editor.commit(store).map_err(|err| log_write_failure(&err))
    });
    match result {
        Ok(()) => {
            PortfolioActionResponse::success_with_id("Project deleted.", project_id.to_string())
        }
        Err(err) => PortfolioActionResponse::failure(err),
    }
}

fn save_profile_at(
    db_path: &Path,
    personal_info_json: &str,
    contact_json: &str,
) -> PortfolioActionResponse {
    let personal_info: PersonalInfo = match serde_json::from_str(personal_info_json) {
        Ok(value) => value,
        Err(err) => {
            return PortfolioActionResponse::failure(format!("invalid personal info: {err}"))
        }
    };
    let contact: Contact = match serde_json::from_str(contact_json) {
        Ok(value) => value,
        Err(err) => return PortfolioActionResponse::failure(format!("invalid contact: {err}")),
    };

    let result = with_store(db_path, |store| {
        let mut editor = ProfileEditor::from_store(store);
        *editor.begin_edit() = ProfileDraft {
            personal_info,
            contact,
        };
        editor
            .save(store)
            .map(|_| ())
            .map_err(|err| log_write_failure(&err))
    });
    match result {
        Ok(()) => PortfolioActionResponse::success("Profile saved."),
        Err(err) => PortfolioActionResponse::failure(err),
    }
}

fn export_at(db_path: &Path) -> PortfolioExportResponse {
    let file_name = export_file_name(Local::now().date_naive());
    match with_store(db_path, |store| {
        store.export_document().map_err(|err| err.to_string())
    }) {
        Ok(content) => PortfolioExportResponse {
            ok: true,
            file_name,
            content,
            message: "Portfolio exported.".to_string(),
        },
        Err(err) => PortfolioExportResponse {
            ok: false,
            file_name,
            content: String::new(),
            message: format!("portfolio_export failed: {err}"),
        },
    }
}

fn import_at(db_path: &Path, content: &str) -> PortfolioActionResponse {
    let result = with_store(db_path, |store| {
        store.import_document(content).map_err(|err| match err {
            StoreError::Import(err) => err.user_message(),
            StoreError::Validation(err) => ImportError::from(err).user_message(),
            other => log_write_failure(&other),
        })
    });
    match result {
        Ok(()) => PortfolioActionResponse::success("Data imported successfully!"),
        Err(message) => PortfolioActionResponse::failure(message),
    }
}

fn reset_at(db_path: &Path) -> PortfolioActionResponse {
    match with_store(db_path, |store| {
        store.clear_all().map_err(|err| log_write_failure(&err))
    }) {
        Ok(()) => PortfolioActionResponse::success("Portfolio reset to original data."),
        Err(err) => PortfolioActionResponse::failure(err),
    }
}

fn log_write_failure(err: &StoreError) -> String {
    warn!("event=ffi_write module=ffi status=error error={err}");
    SAVE_FAILED_MESSAGE.to_string()
}
