//! Storage gateways - content reads, versioned commits, and media uploads
//!
//! Network and disk effects live behind small async traits so the session
//! logic stays testable and the backing store swappable.

mod fs;
mod github;
mod persist;
mod upload;

pub use fs::{FsArticleReader, FsMediaLister};
pub use github::GitHubStore;
pub use persist::PersistenceGateway;
pub use upload::FsMediaUploader;

use async_trait::async_trait;
use thiserror::Error;

/// Failures surfaced by the storage gateways.
///
/// None of these are retried automatically; callers decide whether to
/// resubmit.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error("upstream error: {0}")]
    Upstream(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Map an I/O failure onto the gateway error set
pub(crate) fn io_error(e: std::io::Error) -> StoreError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StoreError::NotFound
    } else {
        StoreError::Upstream(e.to_string())
    }
}

/// Raw article text lookup
#[async_trait]
pub trait ArticleReader: Send + Sync {
    /// Fetch the raw markdown of an article. `NotFound` when the article
    /// does not exist.
    async fn get(&self, category: &str, slug: &str) -> StoreResult<String>;
}

/// Media listing for one article folder
#[async_trait]
pub trait MediaLister: Send + Sync {
    /// Public paths of the images present in the article folder
    async fn list(&self, category: &str, slug: &str) -> StoreResult<Vec<String>>;
}

/// A version-controlled file store supporting conditional writes.
///
/// This is the seam behind [`PersistenceGateway`]: a git-hosting API, a
/// database, or a local versioned filesystem can all back it.
#[async_trait]
pub trait VersionedStore: Send + Sync {
    /// Current version token of `path`. `NotFound` when the path is absent;
    /// new paths cannot be created through this store.
    async fn fetch_version_token(&self, path: &str) -> StoreResult<String>;

    /// Write `content` to `path`, conditioned on `token` still matching the
    /// server state. A token made stale by a concurrent commit surfaces as
    /// `Upstream`.
    async fn commit(&self, path: &str, content: &str, token: &str) -> StoreResult<()>;
}

/// Binary media storage with canonical public paths
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Store `bytes` and return the public path it will be served from.
    /// Existing files at the same location are overwritten.
    async fn store(
        &self,
        category: &str,
        slug: &str,
        filename: &str,
        bytes: &[u8],
    ) -> StoreResult<String>;
}
