//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the key-value medium into portfolio-level operations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod onboarding;
pub mod portfolio_store;
pub mod profile_editor;
pub mod project_editor;
