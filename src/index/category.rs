//! Category mapping
//!
//! Posts are filed by physical directory, but listed by virtual category. The
//! mapping lets content be regrouped for readers without moving files or
//! changing post URLs.

use serde::Serialize;

use crate::config::CategoryConfig;

/// A resolved category with its post count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Virtual path, e.g. "engineering/agentic"
    pub path: String,
    pub main: String,
    /// Empty for single-segment paths
    pub sub: String,
    pub name: String,
    pub main_name: String,
    pub description: String,
    pub count: usize,
}

/// A top-level category with the posts of all its sub-categories counted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainCategory {
    pub key: String,
    pub name: String,
    pub description: String,
    pub count: usize,
}

/// Maps slugs to virtual category paths and resolves display metadata
#[derive(Debug, Clone)]
pub struct CategoryMapper {
    config: CategoryConfig,
}

impl CategoryMapper {
    pub fn new(config: CategoryConfig) -> Self {
        Self { config }
    }

    /// Storage directory of a slug, cut to its first two segments.
    /// Empty for posts at the content root.
    pub fn physical_key(slug: &str) -> String {
        let segments: Vec<&str> = slug.split('/').filter(|s| !s.is_empty()).collect();
        let dirs = &segments[..segments.len().saturating_sub(1)];
        dirs.iter().take(2).copied().collect::<Vec<_>>().join("/")
    }

    /// Virtual category path of a slug; never empty
    pub fn category_of(&self, slug: &str) -> String {
        let key = Self::physical_key(slug);
        let mapped = match self.lookup_directory(&key) {
            Some(virtual_path) => virtual_path.trim_matches('/').to_string(),
            None => key,
        };
        if mapped.is_empty() {
            self.default_category()
        } else {
            mapped
        }
    }

    /// Directory table entry for `key`; configured keys may carry stray slashes
    fn lookup_directory(&self, key: &str) -> Option<&String> {
        if key.is_empty() {
            return None;
        }
        self.config.directories.get(key).or_else(|| {
            self.config
                .directories
                .iter()
                .find(|(dir, _)| dir.trim_matches('/') == key)
                .map(|(_, virtual_path)| virtual_path)
        })
    }

    fn default_category(&self) -> String {
        let default = self.config.default.trim_matches('/');
        if default.is_empty() {
            "uncategorized".to_string()
        } else {
            default.to_string()
        }
    }

    /// Split a category path into its main and sub segments
    pub fn split(path: &str) -> (&str, &str) {
        match path.split_once('/') {
            Some((main, sub)) => (main, sub),
            None => (path, ""),
        }
    }

    /// Display name of a full category path
    pub fn name_of(&self, path: &str) -> String {
        self.config
            .meta
            .get(path)
            .map(|m| m.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(path)
            .to_string()
    }

    /// Display name of the main segment of a category path
    pub fn main_name_of(&self, path: &str) -> String {
        let (main, _) = Self::split(path);
        self.name_of(main)
    }

    pub fn description_of(&self, path: &str) -> String {
        self.config
            .meta
            .get(path)
            .map(|m| m.description.clone())
            .unwrap_or_default()
    }

    /// Configured main categories, in navigation order
    pub fn main_categories(&self) -> &[String] {
        &self.config.main
    }

    /// Position of a main segment in navigation order; unknown ones sort last
    pub(crate) fn main_rank(&self, main: &str) -> usize {
        self.config
            .main
            .iter()
            .position(|m| m == main)
            .unwrap_or(self.config.main.len())
    }

    /// Build the category record for a path
    pub fn describe(&self, path: &str, count: usize) -> Category {
        let (main, sub) = Self::split(path);
        Category {
            path: path.to_string(),
            main: main.to_string(),
            sub: sub.to_string(),
            name: self.name_of(path),
            main_name: self.main_name_of(path),
            description: self.description_of(path),
            count,
        }
    }
}

impl Default for CategoryMapper {
    fn default() -> Self {
        Self::new(CategoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryMeta;

    #[test]
    fn test_physical_key() {
        assert_eq!(CategoryMapper::physical_key("engineering/agentic/post"), "engineering/agentic");
        assert_eq!(CategoryMapper::physical_key("a/b/c/post"), "a/b");
        assert_eq!(CategoryMapper::physical_key("notes/post"), "notes");
        assert_eq!(CategoryMapper::physical_key("post"), "");
    }

    #[test]
    fn test_mapped_directory() {
        let mapper = CategoryMapper::default();
        assert_eq!(mapper.category_of("insights/technology/ai"), "industry/technology");
        assert_eq!(mapper.category_of("insights/science/language"), "science/science");
        assert_eq!(mapper.category_of("engineering/agentic/x/deep"), "engineering/agentic");
    }

    #[test]
    fn test_directory_keys_with_slashes() {
        let mut config = CategoryConfig::default();
        config
            .directories
            .insert("/notes/tech/".to_string(), "engineering/tooling".to_string());
        let mapper = CategoryMapper::new(config);
        assert_eq!(mapper.category_of("notes/tech/git"), "engineering/tooling");
    }

    #[test]
    fn test_unmapped_directory_passes_through() {
        let mapper = CategoryMapper::default();
        assert_eq!(mapper.category_of("misc/notes/post"), "misc/notes");
        assert_eq!(mapper.category_of("misc/post"), "misc");
    }

    #[test]
    fn test_root_level_post_gets_default() {
        let mapper = CategoryMapper::default();
        assert_eq!(mapper.category_of("about"), "uncategorized");

        let mut config = CategoryConfig::default();
        config.default = String::new();
        assert_eq!(CategoryMapper::new(config).category_of("about"), "uncategorized");
    }

    #[test]
    fn test_category_of_is_total() {
        let mapper = CategoryMapper::default();
        for slug in ["", "/", "a", "a/b", "a/b/c", "中文/目录/文章", "x//y"] {
            assert!(!mapper.category_of(slug).is_empty(), "empty category for {:?}", slug);
        }
    }

    #[test]
    fn test_metadata_fallbacks() {
        let mapper = CategoryMapper::default();
        assert_eq!(mapper.name_of("industry/finance"), "金融分析");
        assert_eq!(mapper.main_name_of("industry/finance"), "Industry");
        assert_eq!(mapper.description_of("industry"), "产业洞察与商业博弈");

        assert_eq!(mapper.name_of("misc/notes"), "misc/notes");
        assert_eq!(mapper.main_name_of("misc/notes"), "misc");
        assert_eq!(mapper.description_of("misc/notes"), "");
    }

    #[test]
    fn test_blank_meta_name_falls_back_to_path() {
        let mut config = CategoryConfig::default();
        config.meta.insert(
            "misc".to_string(),
            CategoryMeta {
                name: String::new(),
                description: "Odds and ends".to_string(),
            },
        );
        let mapper = CategoryMapper::new(config);
        assert_eq!(mapper.name_of("misc"), "misc");
        assert_eq!(mapper.description_of("misc"), "Odds and ends");
    }

    #[test]
    fn test_describe() {
        let mapper = CategoryMapper::default();
        let category = mapper.describe("engineering/agentic", 3);
        assert_eq!(category.main, "engineering");
        assert_eq!(category.sub, "agentic");
        assert_eq!(category.name, "Agentic 系统");
        assert_eq!(category.main_name, "Engineering");
        assert_eq!(category.count, 3);

        let single = mapper.describe("misc", 1);
        assert_eq!(single.sub, "");
    }
}
