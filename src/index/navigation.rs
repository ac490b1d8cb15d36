//! Previous/next navigation within a reading context
//!
//! Scopes are newest-first, so "previous" is the entry after the post (older)
//! and "next" the entry before it (newer).

use indexmap::IndexMap;
use serde::Serialize;

use super::snapshot::PostIndex;
use crate::content::Post;

/// Neighbours of a post within one scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NavigationInfo<'a> {
    pub prev: Option<&'a Post>,
    pub next: Option<&'a Post>,
}

impl<'a> NavigationInfo<'a> {
    /// Locate `slug` in a newest-first scope. `None` if it is not in the scope.
    pub fn within(scope: &[&'a Post], slug: &str) -> Option<Self> {
        let i = scope.iter().position(|p| p.slug == slug)?;
        Some(Self {
            prev: scope.get(i + 1).copied(),
            next: i.checked_sub(1).map(|j| scope[j]),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

/// A post with every navigation scope it can be read in
#[derive(Debug, Clone, Serialize)]
pub struct PostWithNavigation<'a> {
    pub post: &'a Post,
    pub global_nav: NavigationInfo<'a>,
    pub tag_nav: IndexMap<String, NavigationInfo<'a>>,
}

impl<'a> PostWithNavigation<'a> {
    /// Navigation for a reader arriving from `tag`; readers without a tag, or
    /// with a tag this post does not carry, get the global navigation.
    pub fn nav_for(&self, tag: Option<&str>) -> &NavigationInfo<'a> {
        tag.and_then(|t| self.tag_nav.get(t))
            .unwrap_or(&self.global_nav)
    }
}

impl PostIndex {
    /// The ordered scope navigation runs over for `post` in `context`
    fn scope(&self, post: &Post, context: Option<&str>) -> Vec<&Post> {
        match context {
            Some(tag) => self.posts_by_tag(tag),
            None if post.tags.is_empty() => self.all_posts().iter().collect(),
            None => self
                .all_posts()
                .iter()
                .filter(|candidate| candidate.shares_tag_with(post))
                .collect(),
        }
    }

    /// Previous/next for `slug`.
    ///
    /// Returns `None` when no such post exists. When the post exists but is
    /// outside the requested tag scope, both neighbours are empty.
    pub fn resolve(&self, slug: &str, context: Option<&str>) -> Option<NavigationInfo<'_>> {
        let post = self.get(slug)?;
        let scope = self.scope(post, context);
        Some(NavigationInfo::within(&scope, slug).unwrap_or_default())
    }

    /// Like [`PostIndex::resolve`], with a missing post reported as empty navigation
    pub fn navigate(&self, slug: &str, context: Option<&str>) -> NavigationInfo<'_> {
        self.resolve(slug, context).unwrap_or_default()
    }

    /// A post with its context-free navigation and one entry per tag it carries
    pub fn with_navigation(&self, slug: &str) -> Option<PostWithNavigation<'_>> {
        let post = self.get(slug)?;
        let global_nav = self.navigate(slug, None);
        let tag_nav = post
            .tags
            .iter()
            .map(|tag| (tag.clone(), self.navigate(slug, Some(tag.as_str()))))
            .collect();

        Some(PostWithNavigation {
            post,
            global_nav,
            tag_nav,
        })
    }
}
