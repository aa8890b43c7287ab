//! Portfolio aggregate domain model.
//!
//! # Responsibility
//! - Define the canonical records shown on the site and edited by admins.
//! - Keep the JSON wire shape stable for overrides, import and export.
//!
//! # Invariants
//! - Identifiers are non-empty and unique within their collection.
//! - Collections never reference each other by identifier; technologies are
//!   plain string labels.
//! - `Proficiency` is always within `1..=5`.

use crate::model::section::Section;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of a collection entry. Unique within its collection only.
pub type EntryId = String;

/// Project grouping shown as a filter on the projects page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Web,
    Mobile,
    Desktop,
    Ai,
    Other,
}

/// Delivery state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Completed,
    InProgress,
    Planned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    Tools,
    Languages,
    Frameworks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

/// Skill rating on a closed `1..=5` scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Proficiency(u8);

impl Proficiency {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, PortfolioValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PortfolioValidationError::ProficiencyOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Proficiency {
    type Error = PortfolioValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Proficiency> for u8 {
    fn from(value: Proficiency) -> Self {
        value.0
    }
}

/// Showcase project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntryId,
    pub title: String,
    /// One-line summary used on cards.
    pub description: String,
    pub long_description: String,
    pub technologies: Vec<String>,
    /// Cover image URL.
    pub image: String,
    /// Gallery image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub category: ProjectCategory,
    pub featured: bool,
    /// `YYYY-MM-DD`.
    pub created_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub learnings: Vec<String>,
}

impl Project {
    /// Creates a project with form defaults for the add flow.
    ///
    /// # Invariants
    /// - Category starts as `web` and status as `planned`.
    /// - All text and list fields start empty.
    pub fn with_defaults(id: impl Into<EntryId>, created_date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            long_description: String::new(),
            technologies: Vec::new(),
            image: String::new(),
            images: Vec::new(),
            github_url: None,
            live_url: None,
            category: ProjectCategory::Web,
            featured: false,
            created_date: created_date.into(),
            completed_date: None,
            status: ProjectStatus::Planned,
            challenges: Vec::new(),
            learnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: EntryId,
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: Proficiency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Fractional values such as `2.5` are allowed.
    pub years_of_experience: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: EntryId,
    pub company: String,
    pub position: String,
    pub start_date: String,
    /// `None` while the position is current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub description: String,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    /// Serialized as `type` to match the external document shape.
    #[serde(rename = "type")]
    pub kind: EmploymentType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: EntryId,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    pub achievements: Vec<String>,
    pub coursework: Vec<String>,
}

/// Contact details.
///
/// Absent optional fields serialize as `null`, so a stored record override
/// clears the matching baseline value instead of inheriting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub location: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub avatar: String,
    /// URL of the downloadable resume.
    pub resume: String,
    pub tagline: String,
    pub years_of_experience: f64,
}

/// Root aggregate: everything the site renders and the admin panel edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub personal_info: PersonalInfo,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub contact: Contact,
}

impl Portfolio {
    /// Validates aggregate-level invariants.
    ///
    /// # Errors
    /// - `EmptyId` when any collection entry has a blank identifier.
    /// - `DuplicateId` when two entries of one collection share an identifier.
    pub fn validate(&self) -> Result<(), PortfolioValidationError> {
        ensure_unique_ids(Section::Projects, self.projects.iter().map(|p| p.id.as_str()))?;
        ensure_unique_ids(Section::Skills, self.skills.iter().map(|s| s.id.as_str()))?;
        ensure_unique_ids(
            Section::Experience,
            self.experience.iter().map(|e| e.id.as_str()),
        )?;
        ensure_unique_ids(
            Section::Education,
            self.education.iter().map(|e| e.id.as_str()),
        )?;
        Ok(())
    }

    /// Returns one project by identifier.
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }
}

/// Ensures identifiers yielded by `ids` are non-empty and pairwise distinct.
pub(crate) fn ensure_unique_ids<'a>(
    section: Section,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), PortfolioValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(PortfolioValidationError::EmptyId { section });
        }
        if !seen.insert(id) {
            return Err(PortfolioValidationError::DuplicateId {
                section,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Aggregate invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortfolioValidationError {
    EmptyId { section: Section },
    DuplicateId { section: Section, id: EntryId },
    ProficiencyOutOfRange(u8),
}

impl Display for PortfolioValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId { section } => write!(f, "{section} contains an entry with an empty id"),
            Self::DuplicateId { section, id } => {
                write!(f, "{section} contains duplicate id `{id}`")
            }
            Self::ProficiencyOutOfRange(value) => write!(
                f,
                "proficiency {value} is outside {}..={}",
                Proficiency::MIN,
                Proficiency::MAX
            ),
        }
    }
}

impl Error for PortfolioValidationError {}
