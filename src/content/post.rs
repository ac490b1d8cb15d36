//! Post model

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Path relative to the content root, '/'-separated, extension removed
    pub slug: String,

    /// Post title
    pub title: String,

    /// Free-text summary
    pub description: String,

    /// Publication date as an ISO date string
    pub pub_date: String,

    /// Post tags, deduplicated, in the order they were written
    pub tags: Vec<String>,

    /// Optional cover image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,

    /// Rendered HTML content
    pub content: String,

    /// Raw markdown body
    #[serde(skip)]
    pub raw: String,

    /// Full source file path
    #[serde(skip)]
    pub source: PathBuf,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: impl Into<String>, title: impl Into<String>, pub_date: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            description: String::new(),
            pub_date: pub_date.into(),
            tags: Vec::new(),
            hero_image: None,
            content: String::new(),
            raw: String::new(),
            source: PathBuf::new(),
        }
    }

    /// Builder-style tag assignment
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the two posts have at least one tag in common
    pub fn shares_tag_with(&self, other: &Post) -> bool {
        self.tags.iter().any(|t| other.has_tag(t))
    }

    /// Feed order: newest first, then title, then slug
    pub fn feed_order(&self, other: &Post) -> Ordering {
        other
            .pub_date
            .cmp(&self.pub_date)
            .then_with(|| compare_titles(&self.title, &other.title))
            .then_with(|| self.slug.cmp(&other.slug))
    }
}

/// Case-insensitive title comparison with a code-point tiebreak
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b))
}
