//! Content loader - loads posts from the content directory

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::markdown::prefix_image_urls;
use super::{FrontMatter, LoadError, Post, Renderer};

/// Loads posts from a content root
pub struct ContentLoader<'a> {
    root: PathBuf,
    renderer: &'a dyn Renderer,
    base_path: String,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(root: impl Into<PathBuf>, renderer: &'a dyn Renderer) -> Self {
        Self {
            root: root.into(),
            renderer,
            base_path: String::new(),
        }
    }

    /// Prefix root-relative image URLs in rendered content with `base_path`
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Load every markdown document under the root.
    ///
    /// Posts come back in traversal order (sorted by file name); ordering by
    /// date is the index's job.
    pub fn load_posts(&self) -> Result<Vec<Post>, LoadError> {
        let metadata = fs::metadata(&self.root).map_err(|source| LoadError::RootUnreadable {
            path: self.root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(LoadError::NotADirectory(self.root.clone()));
        }
        fs::read_dir(&self.root).map_err(|source| LoadError::RootUnreadable {
            path: self.root.clone(),
            source,
        })?;

        let mut posts = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let Some(slug) = slug_for(&self.root, path) else {
                tracing::warn!("Skipping {:?}: path is not valid UTF-8", path);
                continue;
            };

            if seen.contains(&slug) {
                tracing::warn!(
                    "Duplicate slug {:?} from {:?}; keeping the first document",
                    slug,
                    path
                );
                continue;
            }

            match self.load_post(path, &slug) {
                Ok(post) => {
                    tracing::debug!("Loaded post {:?}", post.slug);
                    seen.insert(slug);
                    posts.push(post);
                }
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        tracing::info!("Loaded {} posts from {:?}", posts.len(), self.root);
        Ok(posts)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path, slug: &str) -> anyhow::Result<Post> {
        let content = fs::read_to_string(path)?;

        let (fm, body) = match FrontMatter::split(&content) {
            Some((yaml, body)) => match FrontMatter::from_yaml(yaml) {
                Ok(fm) => (fm, body),
                Err(e) => {
                    tracing::warn!("Malformed front matter in {:?}, using defaults: {}", path, e);
                    (FrontMatter::default(), body)
                }
            },
            None => (FrontMatter::default(), content.as_str()),
        };

        let title = fm.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let rendered = self.renderer.render(body)?;

        let mut post = Post::new(slug, title, fm.pub_date.to_canonical());
        post.description = fm.description.clone().unwrap_or_default();
        post.tags = fm.normalized_tags();
        post.hero_image = fm.hero_image.clone();
        post.content = prefix_image_urls(&rendered, &self.base_path);
        post.raw = body.to_string();
        post.source = path.to_path_buf();

        Ok(post)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Relative path with the extension removed, joined with '/'
fn slug_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str()?),
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}
