//! Media discovery for article folders
//!
//! Images sitting next to an article's markdown file are picked up
//! automatically and merged behind whatever the front matter already
//! declares.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref IMAGE_EXT: Regex = Regex::new(r"(?i)\.(png|jpe?g|gif|webp|avif)$").unwrap();
}

/// Check whether a file name looks like an image
pub fn is_image_file(name: &str) -> bool {
    IMAGE_EXT.is_match(name)
}

/// List image files physically present in `dir`, mapped to public paths
/// `<prefix>/<category>/<slug>/<filename>`.
///
/// Enumeration order is whatever the filesystem yields. An unreadable or
/// missing directory produces an empty listing.
pub fn discover(dir: &Path, prefix: &str, category: &str, slug: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    for entry in entries.flatten() {
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if is_image_file(name) {
            found.push(public_path(prefix, category, slug, name));
        }
    }
    found
}

/// Canonical public path for a file inside an article folder
pub fn public_path(prefix: &str, category: &str, slug: &str, filename: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        prefix.trim_end_matches('/'),
        category,
        slug,
        filename
    )
}

/// Declared entries first, then everything newly discovered, with exact
/// duplicates removed in first-seen order.
pub fn merge(declared: &[String], discovered: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    declared
        .iter()
        .cloned()
        .chain(discovered)
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Full media set for one article folder: the declared front-matter list
/// followed by images physically present that it does not already name.
pub fn resolve(
    dir: &Path,
    prefix: &str,
    category: &str,
    slug: &str,
    declared: &[String],
) -> Vec<String> {
    merge(declared, discover(dir, prefix, category, slug))
}
