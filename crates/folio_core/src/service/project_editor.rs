//! Project CRUD editor.
//!
//! # Responsibility
//! - Hold the admin panel's working project list and one draft at a time.
//! - Gate saving on the minimum required fields.
//! - Track unsaved changes against the last persisted snapshot.
//!
//! # Invariants
//! - The working list changes only through `save` and `delete`.
//! - A rejected save discards the draft and returns to the list view.
//! - New identifiers are time-derived and unique within the working list.
//! - Deletion removes exactly one entry and preserves the order of the rest.

use crate::model::portfolio::{EntryId, Project, ProjectStatus};
use crate::service::portfolio_store::{PortfolioStore, StoreResult};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CREATED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Which record the open draft will write to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// Appends a new record on save.
    New,
    /// Replaces the record with this identifier on save.
    Existing(EntryId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub target: EditTarget,
    pub draft: Project,
}

/// Why a draft was discarded instead of saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftRejection {
    EmptyTitle,
    EmptyDescription,
    /// Draft id collides with another project in the working list.
    DuplicateId(EntryId),
}

impl Display for DraftRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "project title is required"),
            Self::EmptyDescription => write!(f, "project description is required"),
            Self::DuplicateId(id) => write!(f, "project id `{id}` is already used"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { id: EntryId, created: bool },
    Discarded(DraftRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    NotEditing,
    ProjectNotFound(EntryId),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing => write!(f, "no project draft is open"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
        }
    }
}

impl Error for EditorError {}

/// Admin statistics over the working list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub featured: usize,
}

/// Draft/commit editor over the project collection.
#[derive(Debug, Clone)]
pub struct ProjectEditor {
    projects: Vec<Project>,
    persisted: Vec<Project>,
    session: Option<EditSession>,
}

impl ProjectEditor {
    /// Creates an editor whose persisted snapshot equals `projects`.
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            persisted: projects.clone(),
            projects,
            session: None,
        }
    }

    pub fn from_store<S: KeyValueStore>(store: &PortfolioStore<S>) -> Self {
        Self::new(store.data().projects.clone())
    }

    /// Working list, including saved-but-uncommitted drafts.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Open draft and its target, `None` in the list view.
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn draft(&self) -> Option<&Project> {
        self.session.as_ref().map(|session| &session.draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut Project> {
        self.session.as_mut().map(|session| &mut session.draft)
    }

    /// Opens a draft for a new project seeded with form defaults.
    ///
    /// Replaces any draft already open.
    pub fn begin_add(&mut self, now: DateTime<Utc>) -> &mut Project {
        let id = next_project_id(now.timestamp_millis(), &self.projects);
        let created_date = now.date_naive().format(CREATED_DATE_FORMAT).to_string();
        self.open(EditTarget::New, Project::with_defaults(id, created_date))
    }

    /// Opens a draft copy of an existing project.
    pub fn begin_edit(&mut self, id: &str) -> Result<&mut Project, EditorError> {
        let project = self
            .projects
            .iter()
            .find(|project| project.id == id)
            .cloned()
            .ok_or_else(|| EditorError::ProjectNotFound(id.to_string()))?;
        Ok(self.open(EditTarget::Existing(project.id.clone()), project))
    }

    /// Applies the open draft to the working list.
    ///
    /// Always closes the draft. A draft missing its title or description, or
    /// reusing another project's id, is discarded without touching the list.
    pub fn save(&mut self) -> Result<SaveOutcome, EditorError> {
        let session = self.session.take().ok_or(EditorError::NotEditing)?;

        if let Some(rejection) = self.check_draft(&session) {
            warn!("event=project_save module=editor status=discarded reason={rejection}");
            return Ok(SaveOutcome::Discarded(rejection));
        }

        let EditSession { target, draft } = session;
        let id = draft.id.clone();
        let position = match &target {
            EditTarget::Existing(original_id) => self
                .projects
                .iter()
                .position(|project| &project.id == original_id),
            EditTarget::New => None,
        };
        let created = position.is_none();
        match position {
            Some(index) => self.projects[index] = draft,
            None => self.projects.push(draft),
        }

        info!("event=project_save module=editor status=ok created={created}");
        Ok(SaveOutcome::Saved { id, created })
    }

    /// Closes the open draft without changing the working list.
    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Removes one project after `confirm` approves it.
    ///
    /// Returns `Ok(false)` when confirmation is declined.
    pub fn delete(
        &mut self,
        id: &str,
        confirm: impl FnOnce(&Project) -> bool,
    ) -> Result<bool, EditorError> {
        let index = self
            .projects
            .iter()
            .position(|project| project.id == id)
            .ok_or_else(|| EditorError::ProjectNotFound(id.to_string()))?;
        if !confirm(&self.projects[index]) {
            return Ok(false);
        }
        self.projects.remove(index);
        info!("event=project_delete module=editor status=ok");
        Ok(true)
    }

    /// True when the working list differs from the last persisted snapshot.
    pub fn has_unsaved_changes(&self) -> bool {
        self.projects != self.persisted
    }

    /// Persists the working list through `store` and refreshes the snapshot.
    ///
    /// No-op when nothing changed. On failure the snapshot is kept so the
    /// changes stay pending.
    pub fn commit<S: KeyValueStore>(&mut self, store: &mut PortfolioStore<S>) -> StoreResult<()> {
        if !self.has_unsaved_changes() {
            return Ok(());
        }
        store.update_projects(self.projects.clone())?;
        self.persisted = self.projects.clone();
        Ok(())
    }

    /// Discards uncommitted changes to the working list.
    pub fn revert(&mut self) {
        self.projects = self.persisted.clone();
        self.session = None;
    }

    /// Re-reads the list after the store changed underneath (import, reset).
    pub fn reload<S: KeyValueStore>(&mut self, store: &PortfolioStore<S>) {
        *self = Self::from_store(store);
    }

    pub fn stats(&self) -> ProjectStats {
        self.projects
            .iter()
            .fold(ProjectStats::default(), |mut stats, project| {
                stats.total += 1;
                match project.status {
                    ProjectStatus::Completed => stats.completed += 1,
                    ProjectStatus::InProgress => stats.in_progress += 1,
                    ProjectStatus::Planned => {}
                }
                if project.featured {
                    stats.featured += 1;
                }
                stats
            })
    }

    fn open(&mut self, target: EditTarget, draft: Project) -> &mut Project {
        &mut self.session.insert(EditSession { target, draft }).draft
    }

    fn check_draft(&self, session: &EditSession) -> Option<DraftRejection> {
        let draft = &session.draft;
        if draft.title.trim().is_empty() {
            return Some(DraftRejection::EmptyTitle);
        }
        if draft.description.trim().is_empty() {
            return Some(DraftRejection::EmptyDescription);
        }
        let collides = self.projects.iter().any(|project| {
            project.id == draft.id
                && match &session.target {
                    EditTarget::Existing(original_id) => &project.id != original_id,
                    EditTarget::New => true,
                }
        });
        if collides || draft.id.trim().is_empty() {
            return Some(DraftRejection::DuplicateId(draft.id.clone()));
        }
        None
    }
}

/// Returns the first free identifier at or after `now_ms`.
pub fn next_project_id(now_ms: i64, existing: &[Project]) -> EntryId {
    let mut candidate = now_ms;
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|project| project.id == id) {
            return id;
        }
        candidate += 1;
    }
}

/// Splits comma-separated form text into trimmed, non-empty items.
pub fn split_list_input(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins list items into the comma-separated form text.
pub fn join_list_input(items: &[String]) -> String {
    items.join(", ")
}
