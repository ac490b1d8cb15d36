//! Configuration module

mod site;

pub use site::CategoryConfig;
pub use site::CategoryMeta;
pub use site::HighlightConfig;
pub use site::SiteConfig;
