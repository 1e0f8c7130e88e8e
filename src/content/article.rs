//! Article and category models

use serde::{Deserialize, Serialize};

use super::front_matter::FrontMatter;

/// Placeholder when front matter carries no author
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Placeholder when front matter carries no date
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Characters of body text kept in the derived preview
const PREVIEW_LEN: usize = 180;

const PREVIEW_ELLIPSIS: &str = "...";

/// An article backed by one markdown file under `<category>/<slug>/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Resolved title (front matter, first heading, or slug)
    pub title: String,

    /// Folder name, unique within its category
    pub slug: String,

    /// Name of the category directory
    pub category: String,

    /// Free-form date string, shown as written
    pub date: String,

    /// Free-form author string
    pub author: String,

    /// Derived from the body on every scan, never stored
    pub preview: String,

    /// Declared media first, then images discovered next to the file
    pub media: Vec<String>,

    /// Optional path of the image shown above the article
    pub header_image: Option<String>,
}

/// A category directory with its display color
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Directory name under the content root
    pub name: String,

    /// Display color from the style map, or the configured default
    pub color: String,
}

/// Resolve an article title: explicit front-matter title, else the first
/// body line when it is a heading, else the slug.
pub fn derive_title(front_matter: &FrontMatter, body: &str, slug: &str) -> String {
    if let Some(title) = front_matter.text("title").filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    if body.starts_with('#') {
        let heading = body.lines().next().unwrap_or_default();
        return heading.trim_start_matches('#').trim_start().to_string();
    }

    slug.to_string()
}

/// Derive the preview: drop a single leading heading line, keep at most
/// [`PREVIEW_LEN`] characters of what remains, and append an ellipsis
/// regardless of word boundaries.
pub fn preview(body: &str) -> String {
    let mut text: String = strip_leading_heading(body).chars().take(PREVIEW_LEN).collect();
    text.push_str(PREVIEW_ELLIPSIS);
    text
}

/// A heading line only counts when something follows it.
fn strip_leading_heading(body: &str) -> &str {
    if body.starts_with('#') {
        if let Some((_, rest)) = body.split_once('\n') {
            return rest;
        }
    }
    body
}
