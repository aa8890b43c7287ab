//! Portfolio domain model.
//!
//! # Responsibility
//! - Define the canonical aggregate shown by the site and edited by admins.
//! - Name the independently persisted sections of that aggregate.
//!
//! # Invariants
//! - Collection entries are identified by ids unique within the collection.
//! - Sections are replaced wholesale, never patched per entry.

pub mod portfolio;
pub mod section;
