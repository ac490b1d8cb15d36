//! Post index - sorted feed, tag and category partitions, navigation

mod category;
mod navigation;
mod snapshot;

pub use category::{Category, CategoryMapper, MainCategory};
pub use navigation::{NavigationInfo, PostWithNavigation};
pub use snapshot::PostIndex;
