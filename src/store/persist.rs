//! Optimistic-concurrency commit path to the versioned store

use std::sync::Arc;

use super::{StoreResult, VersionedStore};

/// Commits edited content with a fetch-then-write optimistic lock.
///
/// Every commit re-fetches the version token; nothing is cached between
/// calls, so independent sessions cannot silently overwrite each other. The
/// cost is one extra round trip per save.
pub struct PersistenceGateway {
    store: Arc<dyn VersionedStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn VersionedStore>) -> Self {
        Self { store }
    }

    /// Single-shot conditional write.
    ///
    /// A commit landing between the token fetch and the write makes the
    /// token stale and the write fails; there is no re-fetch, retry, or
    /// merge here. The caller reloads and resubmits.
    pub async fn commit(&self, path: &str, content: &str) -> StoreResult<()> {
        let token = self.store.fetch_version_token(path).await?;
        tracing::debug!(path, token = token.as_str(), "committing content");
        self.store.commit(path, content, &token).await
    }
}
