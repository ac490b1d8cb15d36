//! Content module - front matter, rendering and loading of posts

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

use std::path::PathBuf;
use thiserror::Error;

pub use frontmatter::{FrontMatter, PubDate, FALLBACK_PUB_DATE};
pub use loader::ContentLoader;
pub use markdown::{prefix_image_urls, MarkdownRenderer, Renderer};
pub use post::{compare_titles, Post};

/// Errors that stop a content load outright.
///
/// Per-document problems never surface here; they are logged and the
/// document is skipped or defaulted.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("content root {path:?} cannot be read: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("content root {0:?} is not a directory")]
    NotADirectory(PathBuf),
}
