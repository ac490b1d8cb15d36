//! skyblog: a static blog generator with context-aware post navigation
//!
//! Markdown posts are loaded from a content directory into an immutable
//! [`index::PostIndex`], which provides the sorted feed, tag and category
//! views and previous/next navigation scoped to the way a reader arrived.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod index;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentLoader, LoadError, MarkdownRenderer, Post};
use index::{CategoryMapper, PostIndex};

/// Config file name, looked up in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content (posts) directory
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

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

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Markdown renderer configured from the site's highlight settings
    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::with_options(
            &self.config.highlight.theme,
            self.config.highlight.line_number,
        )
    }

    /// Load every post under the content directory
    pub fn load_posts(&self) -> Result<Vec<Post>, LoadError> {
        let renderer = self.renderer();
        ContentLoader::new(&self.content_dir, &renderer)
            .with_base_path(self.config.normalized_base_path())
            .load_posts()
    }

    /// Load posts and build the index over them
    pub fn load_index(&self) -> Result<PostIndex> {
        let posts = self.load_posts()?;
        let mapper = CategoryMapper::new(self.config.categories.clone());
        Ok(PostIndex::build(posts, mapper))
    }

    /// Generate the static route data
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
