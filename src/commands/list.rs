//! List site content

use anyhow::Result;

use crate::helpers::format_pub_date;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let index = blog.load_index()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", index.len());
            for post in index.all_posts() {
                println!(
                    "  {} - {} [{}]",
                    format_pub_date(&post.pub_date, &blog.config.date_format),
                    post.title,
                    post.slug
                );
            }
        }
        "tag" | "tags" => {
            let mut tags = index.tag_counts();
            println!("Tags ({}):", tags.len());
            // stable sort keeps first-appearance order among equal counts
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "category" | "categories" => {
            let main = index.main_categories();
            let categories = index.all_categories();
            println!("Categories ({}):", categories.len());
            for root in &main {
                println!("  {} ({})", root.name, root.count);
                for category in categories.iter().filter(|c| c.main == root.key) {
                    println!("    {} - {} ({})", category.path, category.name, category.count);
                }
            }
            for category in categories
                .iter()
                .filter(|c| !main.iter().any(|m| m.key == c.main))
            {
                println!("  {} - {} ({})", category.path, category.name, category.count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category",
                content_type
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn blog(dir: &TempDir) -> Blog {
        fs::write(dir.path().join("_config.yml"), "content_dir: posts\n").unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(
            dir.path().join("posts/a.md"),
            "---\ntitle: A\ntags: [x]\n---\n",
        )
        .unwrap();
        Blog::new(dir.path()).unwrap()
    }

    #[test]
    fn test_list_types() {
        let dir = TempDir::new().unwrap();
        let blog = blog(&dir);
        for kind in ["post", "tags", "category"] {
            run(&blog, kind).unwrap();
        }
        assert!(run(&blog, "page").is_err());
    }
}
