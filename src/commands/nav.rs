//! Print the neighbours of a post

use anyhow::Result;

use crate::content::Post;
use crate::Blog;

/// Show previous/next for `slug`, optionally as reached from `tag`
pub fn run(blog: &Blog, slug: &str, tag: Option<&str>) -> Result<()> {
    let index = blog.load_index()?;
    let slug = slug.trim_matches('/');
    let Some(nav) = index.resolve(slug, tag) else {
        anyhow::bail!("Post not found: {}", slug);
    };

    match tag {
        Some(tag) => println!("{} (tag: {})", slug, tag),
        None => println!("{}", slug),
    }
    println!("  prev: {}", describe(nav.prev));
    println!("  next: {}", describe(nav.next));
    Ok(())
}

fn describe(post: Option<&Post>) -> String {
    match post {
        Some(post) => format!("{} - {}", post.slug, post.title),
        None => "-".to_string(),
    }
}
