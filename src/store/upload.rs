//! Upload gateway writing media files under the public directory

use async_trait::async_trait;
use std::path::PathBuf;

use super::{io_error, MediaUploader, StoreError, StoreResult};

/// Stores uploaded binaries under `<media dir>/<category>/<slug>/` and hands
/// back the public path they are served from. Uploads overwrite without
/// versioning.
pub struct FsMediaUploader {
    media_dir: PathBuf,
    url_prefix: String,
}

impl FsMediaUploader {
    pub fn new(media_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            media_dir: media_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }
}

#[async_trait]
impl MediaUploader for FsMediaUploader {
    async fn store(
        &self,
        category: &str,
        slug: &str,
        filename: &str,
        bytes: &[u8],
    ) -> StoreResult<String> {
        let category = sanitize_segment(category);
        let slug = sanitize_segment(slug);
        let filename = sanitize_segment(filename);
        if category.is_empty() || slug.is_empty() || filename.is_empty() {
            return Err(StoreError::BadRequest(
                "empty category, slug, or filename".to_string(),
            ));
        }

        let dir = self.media_dir.join(&category).join(&slug);
        std::fs::create_dir_all(&dir).map_err(io_error)?;
        std::fs::write(dir.join(&filename), bytes).map_err(io_error)?;

        tracing::debug!(
            category = category.as_str(),
            slug = slug.as_str(),
            filename = filename.as_str(),
            "stored uploaded media"
        );

        Ok(format!(
            "{}/{}/{}/{}",
            self.url_prefix.trim_end_matches('/'),
            category,
            slug,
            filename
        ))
    }
}

/// Strip path-traversal sequences and neutralize path separators so the
/// triple can only name a file inside the media directory.
fn sanitize_segment(segment: &str) -> String {
    segment.replace("..", "").replace(['/', '\\'], "_")
}
