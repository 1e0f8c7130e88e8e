//! Site configuration (config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fallback display color for categories missing from the style map
pub const DEFAULT_CATEGORY_COLOR: &str = "#607d8b";

/// Repository-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the category/slug article tree
    pub content_dir: String,

    /// Directory served as the site's public root
    pub public_dir: String,

    /// Public URL prefix under which article folders are served
    pub content_url_prefix: String,

    /// Public URL prefix under which uploaded media is served
    pub media_url_prefix: String,

    /// Display color for categories without a style entry
    pub default_category_color: String,

    /// Per-category styling, keyed by directory name
    pub categories: IndexMap<String, CategoryStyle>,
}

/// Display settings for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryStyle {
    pub color: String,

    /// Pinned into the header navigation
    pub show_in_header: bool,

    /// Offered in the dropdown navigation
    pub show_in_dropdown: bool,

    /// Explicit page target; categories without one share the generic page
    pub link_to: Option<String>,

    /// Override for the on-disk folder backing this category
    pub data_folder: Option<String>,

    /// Banner media shown on the category page
    pub media: Vec<String>,
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_CATEGORY_COLOR.to_string(),
            show_in_header: false,
            show_in_dropdown: true,
            link_to: None,
            data_folder: None,
            media: Vec::new(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "texts".to_string(),
            public_dir: "public".to_string(),
            content_url_prefix: "/texts".to_string(),
            media_url_prefix: "/media".to_string(),
            default_category_color: DEFAULT_CATEGORY_COLOR.to_string(),
            categories: IndexMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Display color for a category, falling back to the default
    pub fn category_color(&self, name: &str) -> String {
        self.categories
            .get(name)
            .map(|style| style.color.clone())
            .unwrap_or_else(|| self.default_category_color.clone())
    }

    /// Names of categories pinned into the header navigation
    pub fn header_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|(_, style)| style.show_in_header)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Names of categories offered in the dropdown navigation
    pub fn dropdown_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|(_, style)| style.show_in_dropdown)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Remote store settings, taken from the environment so credentials never
/// sit in the config file.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// `owner/name` of the backing repository
    pub repo: String,

    /// Branch commits are written to
    pub branch: String,

    /// API token
    pub token: String,
}

impl RemoteConfig {
    /// Read `GITHUB_REPO`, `GITHUB_TOKEN`, and optionally `GITHUB_BRANCH`
    /// (default `main`).
    pub fn from_env() -> Result<Self> {
        let repo = std::env::var("GITHUB_REPO").context("GITHUB_REPO is not set")?;
        let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is not set")?;
        let branch = std::env::var("GITHUB_BRANCH").unwrap_or_else(|_| "main".to_string());
        Ok(Self { repo, branch, token })
    }
}
