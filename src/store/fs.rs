//! Filesystem-backed read gateways over the content tree

use async_trait::async_trait;
use std::path::PathBuf;

use super::{io_error, ArticleReader, MediaLister, StoreError, StoreResult};
use crate::content::{media, scanner};

/// Serves raw article text straight from the content directory
pub struct FsArticleReader {
    content_dir: PathBuf,
}

impl FsArticleReader {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }
}

#[async_trait]
impl ArticleReader for FsArticleReader {
    async fn get(&self, category: &str, slug: &str) -> StoreResult<String> {
        let dir = self.content_dir.join(category).join(slug);
        if !dir.is_dir() {
            return Err(StoreError::NotFound);
        }

        let path = scanner::select_markdown_file(&dir, slug).ok_or(StoreError::NotFound)?;
        std::fs::read_to_string(&path).map_err(io_error)
    }
}

/// Lists the images physically present in an article folder
pub struct FsMediaLister {
    content_dir: PathBuf,
    url_prefix: String,
}

impl FsMediaLister {
    pub fn new(content_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            content_dir: content_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }
}

#[async_trait]
impl MediaLister for FsMediaLister {
    async fn list(&self, category: &str, slug: &str) -> StoreResult<Vec<String>> {
        let dir = self.content_dir.join(category).join(slug);
        if !dir.is_dir() {
            return Err(StoreError::NotFound);
        }

        Ok(media::discover(&dir, &self.url_prefix, category, slug))
    }
}
