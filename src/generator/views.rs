//! Serializable views of the index
//!
//! The same shapes are written to disk by the generator and returned by the
//! API server, so a static deploy and `skyblog serve` agree on the data.

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{self, PaginationData, Paginator};
use crate::index::{Category, MainCategory, NavigationInfo, PostIndex};

/// A post as it appears in a listing
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub pub_date: &'a str,
    pub display_date: String,
    pub tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<&'a str>,
    pub category: String,
    /// Link to the post, carrying the listing's tag when there is one
    pub url: String,
}

impl<'a> PostSummary<'a> {
    pub fn new(post: &'a Post, index: &PostIndex, config: &SiteConfig, context: Option<&str>) -> Self {
        Self {
            slug: &post.slug,
            title: &post.title,
            description: &post.description,
            pub_date: &post.pub_date,
            display_date: helpers::format_pub_date(&post.pub_date, &config.date_format),
            tags: &post.tags,
            hero_image: post.hero_image.as_deref(),
            category: index.category_of(&post.slug).unwrap_or_default().to_string(),
            url: helpers::url_for(config, &helpers::post_path(&post.slug, context)),
        }
    }
}

/// One page of a listing (global, tag or category)
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage<'a> {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub posts: Vec<PostSummary<'a>>,
    pub pagination: PaginationData,
}

/// A neighbouring post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub slug: String,
    pub title: String,
    pub url: String,
}

/// Links to the neighbours of a post within one reading context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavLinks {
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

impl NavLinks {
    pub fn new(nav: &NavigationInfo<'_>, config: &SiteConfig, context: Option<&str>) -> Self {
        let link = |post: &Post| NavLink {
            slug: post.slug.clone(),
            title: post.title.clone(),
            url: helpers::url_for(config, &helpers::post_path(&post.slug, context)),
        };
        Self {
            prev: nav.prev.map(link),
            next: nav.next.map(link),
        }
    }
}

/// A single post with its category and navigation
#[derive(Debug, Clone, Serialize)]
pub struct PostPage<'a> {
    pub post: &'a Post,
    pub display_date: String,
    pub category: Category,
    /// Tag the reader arrived from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Navigation for `context`
    pub nav: NavLinks,
    /// Navigation for every tag the post carries, for readers switching context
    pub tag_nav: IndexMap<String, NavLinks>,
}

/// Tag with its post count
#[derive(Debug, Clone, Serialize)]
pub struct TagEntry {
    pub name: String,
    pub count: usize,
    pub url: String,
}

/// Category tree overview
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOverview {
    pub main: Vec<MainCategory>,
    pub categories: Vec<Category>,
}

/// The post page for `slug` read from `context`, or `None` if there is no such post
pub fn post_page<'a>(
    index: &'a PostIndex,
    config: &SiteConfig,
    slug: &str,
    context: Option<&str>,
) -> Option<PostPage<'a>> {
    let full = index.with_navigation(slug)?;
    let path = index.category_of(slug).unwrap_or_default();
    let category = index
        .mapper()
        .describe(path, index.posts_by_category(path).len());

    let nav = match context {
        Some(_) => index.navigate(slug, context),
        None => full.global_nav,
    };
    let tag_nav = full
        .tag_nav
        .iter()
        .map(|(tag, nav)| (tag.clone(), NavLinks::new(nav, config, Some(tag.as_str()))))
        .collect();

    Some(PostPage {
        post: full.post,
        display_date: helpers::format_pub_date(&full.post.pub_date, &config.date_format),
        category,
        context: context.map(str::to_string),
        nav: NavLinks::new(&nav, config, context),
        tag_nav,
    })
}

fn listing<'a, F>(
    posts: &[&'a Post],
    index: &PostIndex,
    config: &SiteConfig,
    page: usize,
    context: Option<&str>,
    link: F,
) -> Option<(Vec<PostSummary<'a>>, PaginationData)>
where
    F: Fn(usize) -> String,
{
    let paginator = Paginator::new(posts, config.per_page);
    let items = paginator.page(page)?;
    let summaries = items
        .iter()
        .map(|&post| PostSummary::new(post, index, config, context))
        .collect();
    let pagination = paginator.pagination(page, |n| helpers::url_for(config, &link(n)));
    Some((summaries, pagination))
}

/// Page `page` of the global feed
pub fn feed_page<'a>(index: &'a PostIndex, config: &SiteConfig, page: usize) -> Option<ListingPage<'a>> {
    let posts: Vec<&Post> = index.all_posts().iter().collect();
    let (posts, pagination) = listing(&posts, index, config, page, None, helpers::listing_path)?;
    Some(ListingPage {
        title: config.title.clone(),
        tag: None,
        category: None,
        posts,
        pagination,
    })
}

/// Page `page` of the posts tagged `tag`. Unknown tags have no pages.
pub fn tag_page<'a>(
    index: &'a PostIndex,
    config: &SiteConfig,
    tag: &str,
    page: usize,
) -> Option<ListingPage<'a>> {
    let posts = index.posts_by_tag(tag);
    if posts.is_empty() {
        return None;
    }
    let (posts, pagination) =
        listing(&posts, index, config, page, Some(tag), |n| helpers::tag_path(tag, n))?;
    Some(ListingPage {
        title: format!("#{}", tag),
        tag: Some(tag.to_string()),
        category: None,
        posts,
        pagination,
    })
}

/// Page `page` of a category listing.
///
/// Configured main categories always have a (possibly empty) first page;
/// other paths exist only while they hold posts.
pub fn category_page<'a>(
    index: &'a PostIndex,
    config: &SiteConfig,
    path: &str,
    page: usize,
) -> Option<ListingPage<'a>> {
    let path = path.trim_matches('/');
    let posts = index.posts_by_category(path);
    let is_main = index.mapper().main_categories().iter().any(|m| m == path);
    if posts.is_empty() && !is_main {
        return None;
    }

    let category = index.mapper().describe(path, posts.len());
    let (posts, pagination) =
        listing(&posts, index, config, page, None, |n| helpers::category_path(path, n))?;
    Some(ListingPage {
        title: category.name.clone(),
        tag: None,
        category: Some(category),
        posts,
        pagination,
    })
}

/// Every tag with its count, in order of first appearance in the feed
pub fn tag_entries(index: &PostIndex, config: &SiteConfig) -> Vec<TagEntry> {
    index
        .tag_counts()
        .into_iter()
        .map(|(tag, count)| TagEntry {
            name: tag.to_string(),
            count,
            url: helpers::url_for(config, &helpers::tag_path(tag, 1)),
        })
        .collect()
}

pub fn category_overview(index: &PostIndex) -> CategoryOverview {
    CategoryOverview {
        main: index.main_categories(),
        categories: index.all_categories(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CategoryMapper;

    fn post(slug: &str, date: &str, tags: &[&str]) -> Post {
        Post::new(slug, slug.to_uppercase(), date).with_tags(tags.iter().copied())
    }

    fn fixture() -> PostIndex {
        PostIndex::build(
            vec![
                post("ai/x", "2024-03-01", &["foo"]),
                post("ai/y", "2024-02-01", &["foo", "bar"]),
                post("life/z", "2024-01-01", &["bar"]),
            ],
            CategoryMapper::default(),
        )
    }

    #[test]
    fn test_post_page_with_context() {
        let index = fixture();
        let config = SiteConfig::default();
        let page = post_page(&index, &config, "ai/y", Some("foo")).unwrap();
        assert_eq!(page.context.as_deref(), Some("foo"));
        assert_eq!(page.nav.prev, None);
        let next = page.nav.next.unwrap();
        assert_eq!(next.slug, "ai/x");
        assert_eq!(next.url, "/blog/ai/x?tag=foo");
        assert_eq!(page.tag_nav["bar"].prev.as_ref().unwrap().slug, "life/z");
    }

    #[test]
    fn test_post_page_context_not_on_post() {
        let index = fixture();
        let config = SiteConfig::default();
        let page = post_page(&index, &config, "ai/x", Some("bar")).unwrap();
        assert_eq!(page.nav, NavLinks::default());
        assert!(post_page(&index, &config, "missing", None).is_none());
    }

    #[test]
    fn test_feed_page() {
        let index = fixture();
        let mut config = SiteConfig::default();
        config.per_page = 2;

        let first = feed_page(&index, &config, 1).unwrap();
        assert_eq!(first.posts.len(), 2);
        assert_eq!(first.pagination.total, 2);
        assert_eq!(first.pagination.next_link, "/blog/page/2");
        assert_eq!(first.posts[0].url, "/blog/ai/x");

        assert_eq!(feed_page(&index, &config, 2).unwrap().posts.len(), 1);
        assert!(feed_page(&index, &config, 3).is_none());
        assert!(feed_page(&index, &config, 0).is_none());
    }

    #[test]
    fn test_tag_page_links_carry_tag() {
        let index = fixture();
        let config = SiteConfig::default();
        let page = tag_page(&index, &config, "bar", 1).unwrap();
        let urls: Vec<&str> = page.posts.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["/blog/ai/y?tag=bar", "/blog/life/z?tag=bar"]);
        assert!(tag_page(&index, &config, "nope", 1).is_none());
    }

    #[test]
    fn test_main_category_page_exists_when_empty() {
        let index = fixture();
        let config = SiteConfig::default();
        let page = category_page(&index, &config, "science", 1).unwrap();
        assert!(page.posts.is_empty());
        assert_eq!(page.pagination.total, 1);
        assert!(category_page(&index, &config, "no/such", 1).is_none());
    }

    #[test]
    fn test_tag_entries() {
        let index = fixture();
        let config = SiteConfig::default();
        let tags = tag_entries(&index, &config);
        assert_eq!(tags[0].name, "foo");
        assert_eq!(tags[0].count, 2);
        assert_eq!(tags[1].url, "/blog/tag/bar/page/1");
    }
}
