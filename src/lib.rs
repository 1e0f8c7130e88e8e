//! plume: the content repository behind a markdown magazine site
//!
//! Articles live in a `<content>/<category>/<slug>/` file tree as markdown
//! files with a small front-matter block. This crate builds the article and
//! category index from that tree, resolves each article's media, and drives
//! the single-article edit/save round trip that commits changes through a
//! version-controlled remote store with an optimistic concurrency token.

pub mod config;
pub mod content;
pub mod editor;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The content repository rooted at a site directory
#[derive(Clone)]
pub struct ContentRepo {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the category/slug article tree
    pub content_dir: PathBuf,
    /// Directory served as the site's public root
    pub public_dir: PathBuf,
}

impl ContentRepo {
    /// Open the repository at `base_dir`, loading `config.yml` when present.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Walk the content tree into the article/category listing.
    ///
    /// Every call re-scans from disk; there is no cross-call cache.
    pub fn scan(&self) -> Result<content::ScanResult> {
        content::ContentScanner::new(self).scan()
    }

    /// Build an editing session over this repository's content tree,
    /// committing saves through the given remote store.
    pub fn editor(&self, remote: config::RemoteConfig) -> editor::EditorSession {
        let media_dir = self
            .public_dir
            .join(self.config.media_url_prefix.trim_start_matches('/'));

        editor::EditorSession::new(
            Arc::new(store::FsArticleReader::new(self.content_dir.clone())),
            Arc::new(store::FsMediaLister::new(
                self.content_dir.clone(),
                self.config.content_url_prefix.clone(),
            )),
            store::PersistenceGateway::new(Arc::new(store::GitHubStore::new(remote))),
            Arc::new(store::FsMediaUploader::new(
                media_dir,
                self.config.media_url_prefix.clone(),
            )),
            self.config.content_dir.clone(),
        )
    }
}
