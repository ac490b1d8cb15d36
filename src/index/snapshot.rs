//! The post index: one immutable, consistently sorted view of a content load

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::category::{Category, CategoryMapper, MainCategory};
use crate::content::Post;

/// Sorted posts with tag and category partitions.
///
/// Built once from a load pass and never mutated; a content change means
/// building a new index.
#[derive(Debug, Clone)]
pub struct PostIndex {
    /// Feed order: newest first
    posts: Vec<Post>,
    /// Resolved category of `posts[i]`
    categories: Vec<String>,
    by_slug: HashMap<String, usize>,
    /// Tag -> positions in `posts`, tags in order of first appearance
    tags: IndexMap<String, Vec<usize>>,
    mapper: CategoryMapper,
}

impl PostIndex {
    /// Sort and partition a set of posts.
    ///
    /// If two posts share a slug the first one in `posts` is kept.
    pub fn build(posts: Vec<Post>, mapper: CategoryMapper) -> Self {
        let mut seen = HashSet::new();
        let mut posts: Vec<Post> = posts
            .into_iter()
            .filter(|post| {
                let fresh = seen.insert(post.slug.clone());
                if !fresh {
                    tracing::warn!("Dropping duplicate slug {:?} from index", post.slug);
                }
                fresh
            })
            .collect();

        posts.sort_by(|a, b| a.feed_order(b));

        let categories: Vec<String> = posts.iter().map(|p| mapper.category_of(&p.slug)).collect();

        let by_slug = posts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.slug.clone(), i))
            .collect();

        let mut tags: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (i, post) in posts.iter().enumerate() {
            for tag in &post.tags {
                tags.entry(tag.clone()).or_default().push(i);
            }
        }

        tracing::debug!(
            "Indexed {} posts, {} tags, {} categories",
            posts.len(),
            tags.len(),
            categories.iter().collect::<HashSet<_>>().len()
        );

        Self {
            posts,
            categories,
            by_slug,
            tags,
            mapper,
        }
    }

    /// Every post, newest first
    pub fn all_posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn mapper(&self) -> &CategoryMapper {
        &self.mapper
    }

    /// Look a post up by slug
    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.position(slug).map(|i| &self.posts[i])
    }

    pub(crate) fn position(&self, slug: &str) -> Option<usize> {
        self.by_slug.get(slug).copied()
    }

    /// Resolved category of an indexed post
    pub fn category_of(&self, slug: &str) -> Option<&str> {
        self.position(slug).map(|i| self.categories[i].as_str())
    }

    /// Every tag in use, in order of first appearance in the feed
    pub fn tags(&self) -> Vec<&str> {
        self.tags.keys().map(String::as_str).collect()
    }

    /// Tags with the number of posts carrying each
    pub fn tag_counts(&self) -> Vec<(&str, usize)> {
        self.tags
            .iter()
            .map(|(tag, positions)| (tag.as_str(), positions.len()))
            .collect()
    }

    /// Posts carrying `tag`, in feed order
    pub fn posts_by_tag(&self, tag: &str) -> Vec<&Post> {
        self.tags
            .get(tag)
            .map(|positions| positions.iter().map(|&i| &self.posts[i]).collect())
            .unwrap_or_default()
    }

    /// Posts filed under `path` or any of its sub-categories, in feed order
    pub fn posts_by_category(&self, path: &str) -> Vec<&Post> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Vec::new();
        }
        let descendant_prefix = format!("{}/", path);
        self.posts
            .iter()
            .zip(&self.categories)
            .filter(|(_, category)| {
                category.as_str() == path || category.starts_with(&descendant_prefix)
            })
            .map(|(post, _)| post)
            .collect()
    }

    /// Every category that holds at least one post.
    ///
    /// Ordered by the configured main categories (unknown ones last), then
    /// by path.
    pub fn all_categories(&self) -> Vec<Category> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for category in &self.categories {
            *counts.entry(category.as_str()).or_insert(0) += 1;
        }

        let mut categories: Vec<Category> = counts
            .into_iter()
            .map(|(path, count)| self.mapper.describe(path, count))
            .collect();
        categories.sort_by(|a, b| {
            self.mapper
                .main_rank(&a.main)
                .cmp(&self.mapper.main_rank(&b.main))
                .then_with(|| a.path.cmp(&b.path))
        });
        categories
    }

    /// Configured main categories with aggregated counts
    pub fn main_categories(&self) -> Vec<MainCategory> {
        self.mapper
            .main_categories()
            .iter()
            .map(|key| MainCategory {
                key: key.clone(),
                name: self.mapper.name_of(key),
                description: self.mapper.description_of(key),
                count: self.posts_by_category(key).len(),
            })
            .collect()
    }
}
