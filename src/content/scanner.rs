//! Content tree scanner - builds the article index from the category/slug tree
//!
//! Every scan walks the tree from scratch; nothing is cached between calls,
//! so the result is always consistent with what is on disk at the time of
//! the walk.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{article, front_matter, media, Article, Category};
use crate::ContentRepo;

const MARKDOWN_EXT: &str = "md";

/// Builds the article and category listing from the content directory
pub struct ContentScanner<'a> {
    repo: &'a ContentRepo,
}

/// Everything one pass over the content tree produces.
///
/// Ordering of both collections follows filesystem enumeration and is not
/// guaranteed stable.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub articles: Vec<Article>,
    pub categories: Vec<Category>,
}

impl<'a> ContentScanner<'a> {
    pub fn new(repo: &'a ContentRepo) -> Self {
        Self { repo }
    }

    /// Scan the whole tree. Folders without a markdown file are skipped
    /// silently; unreadable files are skipped with a warning.
    pub fn scan(&self) -> Result<ScanResult> {
        let content_dir = &self.repo.content_dir;
        if !content_dir.exists() {
            return Ok(ScanResult::default());
        }

        let mut result = ScanResult::default();

        for category_dir in subdirectories(content_dir) {
            let category = dir_name(&category_dir);

            result.categories.push(Category {
                name: category.clone(),
                color: self.repo.config.category_color(&category),
            });

            for slug_dir in subdirectories(&category_dir) {
                let slug = dir_name(&slug_dir);
                match self.load_article(&category, &slug, &slug_dir) {
                    Ok(Some(article)) => result.articles.push(article),
                    // No markdown file: not an article
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Failed to load article {:?}: {}", slug_dir, e);
                    }
                }
            }
        }

        tracing::debug!(
            articles = result.articles.len(),
            categories = result.categories.len(),
            "scanned content tree"
        );

        Ok(result)
    }

    /// Load a single article folder, or `None` when it holds no markdown
    fn load_article(&self, category: &str, slug: &str, dir: &Path) -> Result<Option<Article>> {
        let Some(md_path) = select_markdown_file(dir, slug) else {
            return Ok(None);
        };

        let raw = fs::read_to_string(&md_path)?;
        let (fm, body) = front_matter::parse(&raw);

        let title = article::derive_title(&fm, &body, slug);
        let author = non_empty(fm.text("author"))
            .unwrap_or(article::UNKNOWN_AUTHOR)
            .to_string();
        let date = non_empty(fm.text("date"))
            .unwrap_or(article::UNKNOWN_DATE)
            .to_string();
        let header_image = non_empty(fm.text("header-image")).map(str::to_string);

        // Only a list-typed media field counts as declared media
        let declared = fm.list("media").unwrap_or_default();
        let media = media::resolve(
            dir,
            &self.repo.config.content_url_prefix,
            category,
            slug,
            declared,
        );

        Ok(Some(Article {
            title,
            slug: slug.to_string(),
            category: category.to_string(),
            date,
            author,
            preview: article::preview(&body),
            media,
            header_image,
        }))
    }
}

/// Immediate subdirectories, in filesystem enumeration order
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect()
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Pick `<slug>.md` when present, else the first markdown file found
pub(crate) fn select_markdown_file(dir: &Path, slug: &str) -> Option<PathBuf> {
    let preferred = dir.join(format!("{}.{}", slug, MARKDOWN_EXT));
    if preferred.is_file() {
        return Some(preferred);
    }

    fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.is_file() && is_markdown_file(path))
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == MARKDOWN_EXT)
        .unwrap_or(false)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn write_article(base: &Path, category: &str, slug: &str, file: &str, content: &str) {
        let dir = base.join("texts").join(category).join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), content).unwrap();
    }

    fn repo(base: &TempDir) -> ContentRepo {
        ContentRepo::new(base.path()).unwrap()
    }

    #[test]
    fn test_scan_builds_article_from_tree() {
        let base = TempDir::new().unwrap();
        write_article(
            base.path(),
            "Bascule",
            "my-slug",
            "my-slug.md",
            "---\ntitle: Test\nauthor: Jane\ndate: 2024-01-01\n---\n# Test\ncontent body\n",
        );

        let result = repo(&base).scan().unwrap();
        assert_eq!(result.articles.len(), 1);

        let article = &result.articles[0];
        assert_eq!(article.title, "Test");
        assert_eq!(article.author, "Jane");
        assert_eq!(article.date, "2024-01-01");
        assert_eq!(article.category, "Bascule");
        assert_eq!(article.slug, "my-slug");
        assert!(article.preview.starts_with("content body"));
    }

    #[test]
    fn test_scan_skips_folder_without_markdown() {
        let base = TempDir::new().unwrap();
        let dir = base.path().join("texts/Bascule/empty");
        fs::create_dir_all(&dir).unwrap();
        File::create(dir.join("photo.png")).unwrap();

        let result = repo(&base).scan().unwrap();
        assert!(result.articles.is_empty());
        // The category itself is still observed
        assert_eq!(result.categories.len(), 1);
        assert_eq!(result.categories[0].name, "Bascule");
    }

    #[test]
    fn test_scan_prefers_slug_named_file() {
        let base = TempDir::new().unwrap();
        write_article(base.path(), "Bascule", "my-slug", "aaa.md", "other file");
        write_article(base.path(), "Bascule", "my-slug", "my-slug.md", "chosen file");

        let result = repo(&base).scan().unwrap();
        assert_eq!(result.articles.len(), 1);
        assert!(result.articles[0].preview.starts_with("chosen file"));
    }

    #[test]
    fn test_scan_defaults_author_and_date() {
        let base = TempDir::new().unwrap();
        write_article(base.path(), "Bascule", "bare", "bare.md", "just a body");

        let article = &repo(&base).scan().unwrap().articles[0];
        assert_eq!(article.author, article::UNKNOWN_AUTHOR);
        assert_eq!(article.date, article::UNKNOWN_DATE);
        assert_eq!(article.title, "bare");
        assert!(article.header_image.is_none());
    }

    #[test]
    fn test_scan_title_from_heading() {
        let base = TempDir::new().unwrap();
        write_article(base.path(), "Bascule", "headed", "headed.md", "# Hello\nworld");

        let article = &repo(&base).scan().unwrap().articles[0];
        assert_eq!(article.title, "Hello");
    }

    #[test]
    fn test_scan_merges_declared_and_discovered_media() {
        let base = TempDir::new().unwrap();
        write_article(
            base.path(),
            "Bascule",
            "my-slug",
            "my-slug.md",
            "---\nmedia: [/texts/Bascule/my-slug/a.jpg]\n---\nbody",
        );
        let dir = base.path().join("texts/Bascule/my-slug");
        File::create(dir.join("a.jpg")).unwrap();
        File::create(dir.join("b.jpg")).unwrap();

        let article = &repo(&base).scan().unwrap().articles[0];
        let mut media = article.media.clone();
        assert_eq!(media.remove(0), "/texts/Bascule/my-slug/a.jpg");
        media.sort();
        assert_eq!(media, ["/texts/Bascule/my-slug/b.jpg"]);
    }

    #[test]
    fn test_scan_category_color_from_config() {
        let base = TempDir::new().unwrap();
        fs::write(
            base.path().join("config.yml"),
            "categories:\n  Bascule:\n    color: \"#4caf50\"\n",
        )
        .unwrap();
        write_article(base.path(), "Bascule", "a", "a.md", "body");
        write_article(base.path(), "Autre", "b", "b.md", "body");

        let result = repo(&base).scan().unwrap();
        let color_of = |name: &str| {
            result
                .categories
                .iter()
                .find(|c| c.name == name)
                .unwrap()
                .color
                .clone()
        };
        assert_eq!(color_of("Bascule"), "#4caf50");
        assert_eq!(color_of("Autre"), crate::config::DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn test_scan_missing_content_dir_is_empty() {
        let base = TempDir::new().unwrap();
        let result = repo(&base).scan().unwrap();
        assert!(result.articles.is_empty());
        assert!(result.categories.is_empty());
    }

    #[test]
    fn test_select_markdown_file_fallback() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("other.md")).unwrap();

        let chosen = select_markdown_file(dir.path(), "missing").unwrap();
        assert_eq!(chosen.file_name().unwrap(), "other.md");

        let empty = TempDir::new().unwrap();
        assert!(select_markdown_file(empty.path(), "missing").is_none());
    }
}
