//! Baseline dataset shipped with the application.
//!
//! # Responsibility
//! - Embed the default portfolio document at compile time.
//! - Hand out owned copies so callers can never mutate the shared baseline.
//!
//! # Invariants
//! - The embedded document decodes and validates; covered by unit tests.

use crate::model::portfolio::Portfolio;
use once_cell::sync::Lazy;

const BASELINE_DOCUMENT: &str = include_str!("baseline/portfolio.json");

static BASELINE: Lazy<Portfolio> = Lazy::new(|| {
    serde_json::from_str(BASELINE_DOCUMENT).expect("embedded baseline document must decode")
});

/// Returns an owned copy of the baseline portfolio.
pub fn baseline_portfolio() -> Portfolio {
    BASELINE.clone()
}

/// Returns the raw embedded baseline JSON document.
pub fn baseline_document() -> &'static str {
    BASELINE_DOCUMENT
}
