//! Route data generator
//!
//! Writes one JSON document per route of the site into the public
//! directory. The presentation layer renders pages from these files.

mod views;

pub use views::*;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::helpers::{self, Paginator};
use crate::index::PostIndex;
use crate::Blog;

/// Output entries owned by the generator; anything else in the public
/// directory is left alone.
const OUTPUTS: &[&str] = &["posts", "page", "tag", "category", "tags.json", "categories.json"];

/// Static route data generator
pub struct Generator {
    blog: Blog,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Self {
        Self { blog: blog.clone() }
    }

    /// Generate route data for every post, listing page, tag and category.
    /// Returns the number of files written.
    pub fn generate(&self, index: &PostIndex) -> Result<usize> {
        fs::create_dir_all(&self.blog.public_dir)?;
        self.clear_outputs()?;

        let mut written = 0;
        written += self.generate_post_pages(index)?;
        written += self.generate_feed_pages(index)?;
        written += self.generate_tag_pages(index)?;
        written += self.generate_category_pages(index)?;

        let config = &self.blog.config;
        self.write_json("tags.json", &tag_entries(index, config))?;
        self.write_json("categories.json", &category_overview(index))?;
        written += 2;

        Ok(written)
    }

    fn clear_outputs(&self) -> Result<()> {
        for name in OUTPUTS {
            let path = self.blog.public_dir.join(name);
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Generate `posts/<slug>.json` for every post
    fn generate_post_pages(&self, index: &PostIndex) -> Result<usize> {
        let config = &self.blog.config;
        let mut written = 0;
        for post in index.all_posts() {
            let Some(page) = post_page(index, config, &post.slug, None) else {
                continue;
            };
            self.write_json(&format!("posts/{}.json", post.slug), &page)?;
            written += 1;
        }
        Ok(written)
    }

    /// Generate `page/<n>.json` for the global feed
    fn generate_feed_pages(&self, index: &PostIndex) -> Result<usize> {
        let config = &self.blog.config;
        let last = Paginator::new(index.all_posts(), config.per_page).last_page();
        for n in 1..=last {
            if let Some(page) = feed_page(index, config, n) {
                self.write_json(&format!("page/{}.json", n), &page)?;
            }
        }
        Ok(last)
    }

    /// Generate `tag/<tag>/page/<n>.json` for every tag
    fn generate_tag_pages(&self, index: &PostIndex) -> Result<usize> {
        let config = &self.blog.config;
        let mut written = 0;
        for tag in index.tags() {
            let dir = helpers::fs_segment(tag);
            let mut n = 1;
            while let Some(page) = tag_page(index, config, tag, n) {
                self.write_json(&format!("tag/{}/page/{}.json", dir, n), &page)?;
                written += 1;
                n += 1;
            }
        }
        Ok(written)
    }

    /// Generate `category/<path>/page/<n>.json` for every category in use
    /// and every configured main category
    fn generate_category_pages(&self, index: &PostIndex) -> Result<usize> {
        let config = &self.blog.config;
        let mut paths: Vec<String> = index.mapper().main_categories().to_vec();
        for category in index.all_categories() {
            if !paths.contains(&category.path) {
                paths.push(category.path);
            }
        }

        let mut written = 0;
        for path in &paths {
            let dir = helpers::fs_path(path);
            let mut n = 1;
            while let Some(page) = category_page(index, config, path, n) {
                self.write_json(&format!("category/{}/page/{}.json", dir, n), &page)?;
                written += 1;
                n += 1;
            }
        }
        Ok(written)
    }

    fn write_json<T: Serialize>(&self, relative: &str, value: &T) -> Result<()> {
        let output_path = self.output_path(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&output_path, json)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    fn output_path(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .fold(self.blog.public_dir.clone(), |path, segment| path.join(segment))
    }

    pub fn public_dir(&self) -> &Path {
        &self.blog.public_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "content_dir: posts\npublic_dir: out\nper_page: 1\n",
        )
        .unwrap();
        let posts = dir.path().join("posts/engineering/agentic");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("one.md"),
            "---\ntitle: One\npubDate: 2024-01-01\ntags: [rust lang, ai]\n---\nfirst\n",
        )
        .unwrap();
        fs::write(
            posts.join("two.md"),
            "---\ntitle: Two\npubDate: 2024-02-01\ntags: [ai]\n---\nsecond\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_generate_layout() {
        let dir = site();
        let blog = Blog::new(dir.path()).unwrap();
        let index = blog.load_index().unwrap();
        let generator = Generator::new(&blog);
        generator.generate(&index).unwrap();

        let out = dir.path().join("out");
        assert!(out.join("posts/engineering/agentic/one.json").is_file());
        assert!(out.join("page/1.json").is_file());
        assert!(out.join("page/2.json").is_file());
        assert!(!out.join("page/3.json").exists());
        assert!(out.join("tag/rust%20lang/page/1.json").is_file());
        assert!(out.join("tag/ai/page/2.json").is_file());
        assert!(out.join("category/engineering/agentic/page/1.json").is_file());
        assert!(out.join("category/engineering/page/2.json").is_file());
        // main categories without posts still get an empty first page
        assert!(out.join("category/life/page/1.json").is_file());
        assert!(out.join("tags.json").is_file());
        assert!(out.join("categories.json").is_file());
    }

    #[test]
    fn test_post_json_carries_navigation() {
        let dir = site();
        let blog = Blog::new(dir.path()).unwrap();
        let index = blog.load_index().unwrap();
        Generator::new(&blog).generate(&index).unwrap();

        let json = fs::read_to_string(dir.path().join("out/posts/engineering/agentic/one.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["post"]["title"], "One");
        assert_eq!(value["nav"]["next"]["slug"], "engineering/agentic/two");
        assert!(value["nav"]["prev"].is_null());
        assert!(value["tag_nav"]["rust lang"]["next"].is_null());
        assert_eq!(value["category"]["path"], "engineering/agentic");
    }

    #[test]
    fn test_dot_tags_stay_inside_tag_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "content_dir: posts\npublic_dir: out\n").unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(
            dir.path().join("posts/a.md"),
            "---\ntitle: A\npubDate: 2024-02-01\ntags: ['..']\n---\n",
        )
        .unwrap();
        fs::write(dir.path().join("posts/b.md"), "---\ntitle: B\npubDate: 2024-01-01\n---\n").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        Generator::new(&blog).generate(&blog.load_index().unwrap()).unwrap();

        let out = dir.path().join("out");
        assert!(out.join("tag/%2E%2E/page/1.json").is_file());
        let json = fs::read_to_string(out.join("page/1.json")).unwrap();
        let feed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(feed["posts"].as_array().unwrap().len(), 2);
        assert!(feed.get("tag").is_none());
    }

    #[test]
    fn test_regenerate_removes_stale_outputs() {
        let dir = site();
        let blog = Blog::new(dir.path()).unwrap();
        let generator = Generator::new(&blog);
        generator.generate(&blog.load_index().unwrap()).unwrap();

        fs::remove_file(dir.path().join("posts/engineering/agentic/one.md")).unwrap();
        fs::write(dir.path().join("out/robots.txt"), "User-agent: *\n").unwrap();
        generator.generate(&blog.load_index().unwrap()).unwrap();

        let out = dir.path().join("out");
        assert!(!out.join("posts/engineering/agentic/one.json").exists());
        assert!(!out.join("tag/rust%20lang").exists());
        assert!(out.join("robots.txt").is_file());
    }
}
