//! Content model - articles, front matter, media, and the tree scanner

pub mod article;
pub mod front_matter;
pub mod media;
pub mod scanner;

pub use article::{Article, Category};
pub use front_matter::{FieldValue, FrontMatter};
pub use scanner::{ContentScanner, ScanResult};
