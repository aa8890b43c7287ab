//! Remote persistence of the aggregate document.
//!
//! # Responsibility
//! - Define the remote document port used to pull/push the aggregate.
//! - Provide a GitHub contents-API adapter for that port.
//!
//! # Invariants
//! - The remote format is the same JSON document used by import/export.
//! - Failures are returned to the caller; nothing is retried.

use crate::document::ImportError;
use crate::service::portfolio_store::StoreError;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod github;
pub mod remote;

pub use github::{GitHubConfig, GitHubContentsClient};
pub use remote::{RemoteDocument, RemoteDocumentStore, RemoteSync};

pub type SyncResult<T> = Result<T, SyncError>;

/// Remote sync failure.
#[derive(Debug)]
pub enum SyncError {
    /// Connection settings are missing or malformed.
    Config(String),
    /// Remote has no document at the configured location.
    NotFound,
    Http(reqwest::Error),
    /// Remote answered with a non-success status.
    Status { status: u16, message: String },
    /// Remote payload could not be turned into document text.
    Encoding(String),
    Decode(ImportError),
    Serialize(serde_json::Error),
    Storage(StorageError),
    Store(StoreError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "invalid remote configuration: {message}"),
            Self::NotFound => write!(f, "remote portfolio document not found"),
            Self::Http(err) => write!(f, "remote request failed: {err}"),
            Self::Status { status, message } => {
                write!(f, "remote responded with status {status}: {message}")
            }
            Self::Encoding(message) => write!(f, "invalid remote payload: {message}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize portfolio data: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Config(_) | Self::NotFound | Self::Status { .. } | Self::Encoding(_) => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<ImportError> for SyncError {
    fn from(value: ImportError) -> Self {
        Self::Decode(value)
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<StorageError> for SyncError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<StoreError> for SyncError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
