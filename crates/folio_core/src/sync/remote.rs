//! Remote document port and pull/push orchestration.

use super::{SyncError, SyncResult};
use crate::document::{decode_portfolio_document, encode_portfolio_document};
use crate::model::portfolio::Portfolio;
use crate::service::portfolio_store::PortfolioStore;
use crate::storage::KeyValueStore;
use log::{error, info};

pub const DEFAULT_COMMIT_MESSAGE: &str = "Update portfolio data via admin interface";

/// Document text plus the revision id needed to overwrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub content: String,
    pub sha: String,
}

/// Port to a hosted, versioned document location.
pub trait RemoteDocumentStore {
    /// Returns `None` when no document exists yet.
    fn fetch(&self) -> SyncResult<Option<RemoteDocument>>;

    /// Writes `content` as a new revision and returns its id.
    ///
    /// `previous_sha` must be the current revision id, or `None` to create.
    fn put(&self, content: &str, previous_sha: Option<&str>, message: &str)
        -> SyncResult<String>;
}

/// Pulls and pushes the aggregate through a `RemoteDocumentStore`.
pub struct RemoteSync<R: RemoteDocumentStore> {
    remote: R,
}

impl<R: RemoteDocumentStore> RemoteSync<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Fetches and decodes the remote aggregate.
    ///
    /// # Errors
    /// - `NotFound` when the remote has no document.
    /// - `Decode` when the document fails schema validation.
    pub fn pull(&self) -> SyncResult<Portfolio> {
        info!("event=remote_pull module=sync status=start");
        let result = self
            .remote
            .fetch()
            .and_then(|document| document.ok_or(SyncError::NotFound))
            .and_then(|document| {
                decode_portfolio_document(&document.content).map_err(SyncError::from)
            });
        log_outcome("remote_pull", &result);
        result
    }

    /// Commits `portfolio` as the new remote document and returns its revision.
    pub fn push(&self, portfolio: &Portfolio) -> SyncResult<String> {
        info!("event=remote_push module=sync status=start");
        let result = self.push_inner(portfolio);
        log_outcome("remote_push", &result);
        result
    }

    /// Pulls the remote aggregate and imports it into `store`.
    pub fn pull_into<S: KeyValueStore>(&self, store: &mut PortfolioStore<S>) -> SyncResult<()> {
        let portfolio = self.pull()?;
        store.import_all(portfolio)?;
        Ok(())
    }

    fn push_inner(&self, portfolio: &Portfolio) -> SyncResult<String> {
        portfolio
            .validate()
            .map_err(|err| SyncError::Decode(err.into()))?;
        let content = encode_portfolio_document(portfolio)?;
        let previous_sha = self.remote.fetch()?.map(|document| document.sha);
        self.remote
            .put(&content, previous_sha.as_deref(), DEFAULT_COMMIT_MESSAGE)
    }
}

fn log_outcome<T>(event: &str, result: &SyncResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=sync status=ok"),
        Err(err) => error!("event={event} module=sync status=error error={err}"),
    }
}
