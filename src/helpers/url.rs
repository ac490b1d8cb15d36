//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters left alone by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Generate a URL under the configured base path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/page/1") // -> "/prefix/blog/page/1"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.normalized_base_path();
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/prefix/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Encode one URL component the way browsers' `encodeURIComponent` does
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

/// Encode every segment of a slash separated path, keeping the slashes
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Directory name used for a tag in the build output.
///
/// Never `.` or `..`, so a label cannot climb out of its directory.
pub fn fs_segment(tag: &str) -> String {
    if !tag.is_empty() && tag.chars().all(|c| c == '.') {
        return "%2E".repeat(tag.len());
    }
    encode_segment(tag)
}

/// Build output path for a slash separated category path
pub fn fs_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(fs_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Link to a post, carrying the reading context when there is one
pub fn post_path(slug: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("/blog/{}?tag={}", encode_path(slug), encode_segment(tag)),
        None => format!("/blog/{}", encode_path(slug)),
    }
}

/// Link to a page of the global listing
pub fn listing_path(page: usize) -> String {
    format!("/blog/page/{}", page)
}

/// Link to a page of a tag listing
pub fn tag_path(tag: &str, page: usize) -> String {
    format!("/blog/tag/{}/page/{}", encode_segment(tag), page)
}

/// Link to a page of a category listing
pub fn category_path(category: &str, page: usize) -> String {
    format!(
        "/blog/category/{}/page/{}",
        encode_path(category.trim_matches('/')),
        page
    )
}
