//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    /// Deployment path prefix, e.g. "/blog". Empty when served from the domain root.
    pub base_path: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Listing
    pub per_page: usize,
    pub date_format: String,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub categories: CategoryConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Skyfalling Blog".to_string(),
            description: String::new(),
            author: String::new(),

            url: "http://example.com".to_string(),
            base_path: String::new(),

            content_dir: "src/content/blog".to_string(),
            public_dir: "public".to_string(),

            per_page: 18,
            date_format: "%Y-%m-%d".to_string(),

            highlight: HighlightConfig::default(),
            categories: CategoryConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Base path normalized to either "" or "/segment[/segment]" without a trailing slash
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Display metadata for a category path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryMeta {
    pub name: String,
    pub description: String,
}

/// Static category tables.
///
/// `directories` maps a physical storage directory (first two path segments)
/// to a virtual category path. `meta` is keyed by virtual path, both at the
/// main-segment level and the full-path level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Category used for posts stored directly under the content root
    pub default: String,
    /// Main categories in navigation order
    pub main: Vec<String>,
    pub directories: IndexMap<String, String>,
    pub meta: IndexMap<String, CategoryMeta>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        let directories = [
            ("engineering/agentic", "engineering/agentic"),
            ("engineering/architecture", "engineering/architecture"),
            ("engineering/domain", "engineering/domain"),
            ("engineering/middleware", "engineering/middleware"),
            ("engineering/practice", "engineering/practice"),
            ("engineering/tooling", "engineering/tooling"),
            ("engineering/data", "engineering/data"),
            ("insights/technology", "industry/technology"),
            ("insights/business", "industry/business"),
            ("insights/finance", "industry/finance"),
            ("insights/science", "science/science"),
            ("life/digital", "life/digital"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let meta = [
            ("engineering", "Engineering", "系统构建与工程实践"),
            ("industry", "Industry", "产业洞察与商业博弈"),
            ("science", "Science", "科学原理与第一性思考"),
            ("life", "Life", "个体成长与生活实践"),
            ("engineering/agentic", "Agentic 系统", "AI Agent 系统设计与实现"),
            ("engineering/architecture", "架构设计", "系统架构与微服务"),
            ("engineering/domain", "领域建模", "业务架构与领域驱动设计"),
            ("engineering/middleware", "中间件", "消息队列、分布式事务等"),
            ("engineering/practice", "工程实践", "DevOps、CI/CD 与工程化"),
            ("engineering/tooling", "开发工具", "Git、Maven 等开发工具"),
            ("engineering/data", "数据工程", "大数据与数据分析"),
            ("industry/technology", "技术洞察", "AI、区块链等技术趋势"),
            ("industry/business", "商业思考", "创业、品牌与商业模式"),
            ("industry/finance", "金融分析", "投资、数字货币与产业分析"),
            ("science/science", "科学探索", "语言学、认知科学等"),
            ("life/digital", "数字生活", "数字游民、AI 生活与赛博现实"),
        ]
        .into_iter()
        .map(|(path, name, description)| {
            (
                path.to_string(),
                CategoryMeta {
                    name: name.to_string(),
                    description: description.to_string(),
                },
            )
        })
        .collect();

        Self {
            default: "uncategorized".to_string(),
            main: ["engineering", "industry", "science", "life"]
                .into_iter()
                .map(String::from)
                .collect(),
            directories,
            meta,
        }
    }
}
