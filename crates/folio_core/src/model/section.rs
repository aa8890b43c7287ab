//! Aggregate section identities.
//!
//! # Responsibility
//! - Name the six independently persisted parts of a `Portfolio`.
//! - Own the storage key and wire field name of each section.
//!
//! # Invariants
//! - Storage keys are stable; changing one orphans existing overrides.
//! - `Section::ALL` order matches the import write order.

use std::fmt::{Display, Formatter};

/// One independently persisted part of the portfolio aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Projects,
    PersonalInfo,
    Contact,
    Skills,
    Experience,
    Education,
}

impl Section {
    /// All sections in persistence order.
    pub const ALL: [Section; 6] = [
        Section::Projects,
        Section::PersonalInfo,
        Section::Contact,
        Section::Skills,
        Section::Experience,
        Section::Education,
    ];

    /// Key under which the section override is stored.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Projects => "portfolioProjects",
            Self::PersonalInfo => "portfolioPersonalInfo",
            Self::Contact => "portfolioContact",
            Self::Skills => "portfolioSkills",
            Self::Experience => "portfolioExperience",
            Self::Education => "portfolioEducation",
        }
    }

    /// Field name of the section inside an aggregate JSON document.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::PersonalInfo => "personalInfo",
            Self::Contact => "contact",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Education => "education",
        }
    }

    /// Returns whether the section is a single record (shallow-merged on load)
    /// rather than an ordered collection (replaced on load).
    pub fn is_record(self) -> bool {
        matches!(self, Self::PersonalInfo | Self::Contact)
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}
