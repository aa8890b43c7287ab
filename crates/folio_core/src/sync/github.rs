//! GitHub contents-API adapter for the remote document port.
//!
//! # Responsibility
//! - Load and validate connection settings from the key-value medium.
//! - Read and write one file through `GET/PUT /repos/{owner}/{repo}/contents/{path}`.
//!
//! # Invariants
//! - File content travels base64-encoded in both directions.
//! - A missing file on read is `Ok(None)`, never an error.
//! - The token is never logged.

use super::remote::{RemoteDocument, RemoteDocumentStore};
use super::{SyncError, SyncResult};
use crate::storage::KeyValueStore;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const OWNER_KEY: &str = "github_owner";
pub const REPO_KEY: &str = "github_repo";
pub const TOKEN_KEY: &str = "github_token";
pub const BRANCH_KEY: &str = "github_branch";

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_DOCUMENT_PATH: &str = "data/portfolio.json";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CLIENT_USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

static OWNER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,37}[A-Za-z0-9])?$").expect("valid owner regex")
});
static REPO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]{1,100}$").expect("valid repo regex"));

/// Where the remote document lives and how to authenticate.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    pub token: String,
    pub branch: String,
    /// Repository-relative path of the JSON document.
    pub path: String,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .field("branch", &self.branch)
            .field("path", &self.path)
            .finish()
    }
}

impl GitHubConfig {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            branch: DEFAULT_BRANCH.to_string(),
            path: DEFAULT_DOCUMENT_PATH.to_string(),
        }
    }

    /// Reads settings saved by `save_to`.
    ///
    /// A missing or blank branch falls back to `main`.
    ///
    /// # Errors
    /// - `Config` when owner, repo or token is missing or invalid.
    /// - `Storage` when the medium cannot be read.
    pub fn from_store<S: KeyValueStore>(storage: &S) -> SyncResult<Self> {
        let owner = required(storage, OWNER_KEY)?;
        let repo = required(storage, REPO_KEY)?;
        let token = required(storage, TOKEN_KEY)?;
        let mut config = Self::new(owner, repo, token);
        if let Some(branch) = storage.get(BRANCH_KEY)?.filter(|v| !v.trim().is_empty()) {
            config.branch = branch.trim().to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Persists owner, repo, token and branch to the medium.
    pub fn save_to<S: KeyValueStore>(&self, storage: &S) -> SyncResult<()> {
        self.validate()?;
        storage.set(OWNER_KEY, &self.owner)?;
        storage.set(REPO_KEY, &self.repo)?;
        storage.set(TOKEN_KEY, &self.token)?;
        storage.set(BRANCH_KEY, &self.branch)?;
        Ok(())
    }

    pub fn validate(&self) -> SyncResult<()> {
        if !OWNER_RE.is_match(&self.owner) {
            return Err(SyncError::Config(format!(
                "invalid repository owner `{}`",
                self.owner
            )));
        }
        if !REPO_RE.is_match(&self.repo) || self.repo == "." || self.repo == ".." {
            return Err(SyncError::Config(format!(
                "invalid repository name `{}`",
                self.repo
            )));
        }
        if self.token.trim().is_empty() {
            return Err(SyncError::Config("access token is required".to_string()));
        }
        if self.branch.trim().is_empty() {
            return Err(SyncError::Config("branch is required".to_string()));
        }
        let path = self.path.trim_matches('/');
        if path.is_empty() || path.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(SyncError::Config(format!(
                "invalid document path `{}`",
                self.path
            )));
        }
        Ok(())
    }

    /// Contents endpoint for the configured document under `api_base`.
    pub fn contents_url(&self, api_base: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.path.trim_matches('/')
        )
    }
}

fn required<S: KeyValueStore>(storage: &S, key: &str) -> SyncResult<String> {
    storage
        .get(key)?
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SyncError::Config(format!("missing setting `{key}`")))
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: PutContentsEntry,
}

#[derive(Debug, Deserialize)]
struct PutContentsEntry {
    sha: String,
}

/// Blocking GitHub contents-API client for one document.
#[derive(Debug, Clone)]
pub struct GitHubContentsClient {
    http: Client,
    config: GitHubConfig,
    api_base: String,
}

impl GitHubContentsClient {
    pub fn new(config: GitHubConfig) -> SyncResult<Self> {
        Self::with_api_base(config, DEFAULT_API_BASE)
    }

    /// Targets a GitHub-compatible API at `api_base`.
    pub fn with_api_base(config: GitHubConfig, api_base: impl Into<String>) -> SyncResult<Self> {
        config.validate()?;
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            config,
            api_base: api_base.into(),
        })
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT, CLIENT_USER_AGENT)
    }
}

impl RemoteDocumentStore for GitHubContentsClient {
    fn fetch(&self) -> SyncResult<Option<RemoteDocument>> {
        let url = self.config.contents_url(&self.api_base);
        debug!(
            "event=github_fetch module=sync repo={}/{} path={}",
            self.config.owner, self.config.repo, self.config.path
        );
        let response = self
            .authorized(self.http.get(&url))
            .query(&[("ref", self.config.branch.as_str())])
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!("event=github_fetch module=sync status=not_found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(status, response.text().unwrap_or_default()));
        }

        let body: ContentsResponse = response.json()?;
        if let Some(encoding) = body.encoding.as_deref() {
            if encoding != "base64" {
                return Err(SyncError::Encoding(format!(
                    "unsupported content encoding `{encoding}`"
                )));
            }
        }
        Ok(Some(RemoteDocument {
            content: decode_content(&body.content)?,
            sha: body.sha,
        }))
    }

    fn put(
        &self,
        content: &str,
        previous_sha: Option<&str>,
        message: &str,
    ) -> SyncResult<String> {
        let url = self.config.contents_url(&self.api_base);
        let body = PutContentsRequest {
            message,
            content: encode_content(content),
            sha: previous_sha,
            branch: &self.config.branch,
        };
        debug!(
            "event=github_put module=sync repo={}/{} create={}",
            self.config.owner,
            self.config.repo,
            previous_sha.is_none()
        );
        let response = self.authorized(self.http.put(&url)).json(&body).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response.text().unwrap_or_default()));
        }
        let body: PutContentsResponse = response.json()?;
        Ok(body.content.sha)
    }
}

fn status_error(status: StatusCode, body: String) -> SyncError {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or(body);
    SyncError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Decodes contents-API base64, which arrives wrapped at 60 columns.
pub fn decode_content(encoded: &str) -> SyncResult<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|err| SyncError::Encoding(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| SyncError::Encoding(err.to_string()))
}

pub fn encode_content(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}
