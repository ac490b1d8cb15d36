//! Snapshot cache
//!
//! Keeps one immutable post index behind an `Arc` and swaps in a freshly
//! built one when the content tree or the site config changes. There is no
//! partial invalidation: a refresh either replaces the whole snapshot or
//! leaves it alone.

use anyhow::Result;
use chrono::{DateTime, Local};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::index::PostIndex;
use crate::Blog;

/// One consistent build of the site
#[derive(Debug)]
pub struct Snapshot {
    pub blog: Blog,
    pub index: PostIndex,
    /// Fingerprint of the inputs this snapshot was built from
    pub fingerprint: u64,
    pub built_at: DateTime<Local>,
}

impl Snapshot {
    /// Load config and content from `base_dir`
    pub fn build(base_dir: &Path) -> Result<Self> {
        let blog = Blog::new(base_dir)?;
        let fingerprint = fingerprint(&blog)?;
        let index = blog.load_index()?;
        Ok(Self {
            blog,
            index,
            fingerprint,
            built_at: Local::now(),
        })
    }
}

/// Shared, atomically replaced snapshot
pub struct SnapshotCache {
    base_dir: PathBuf,
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotCache {
    /// Build the first snapshot. Fails if the content root cannot be read.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let snapshot = Snapshot::build(&base_dir)?;
        tracing::info!(
            "Snapshot built with {} posts",
            snapshot.index.len()
        );
        Ok(Self {
            base_dir,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// The current snapshot; stays valid even if a refresh replaces it
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rebuild if the inputs changed. Returns whether a new snapshot was swapped in.
    pub fn refresh(&self) -> Result<bool> {
        let blog = Blog::new(&self.base_dir)?;
        let current = self.snapshot();
        if fingerprint(&blog)? == current.fingerprint {
            tracing::debug!(
                "Content unchanged, keeping snapshot built at {}",
                current.built_at.format("%H:%M:%S")
            );
            return Ok(false);
        }
        self.rebuild()?;
        Ok(true)
    }

    /// Unconditionally build and swap in a new snapshot
    pub fn rebuild(&self) -> Result<()> {
        let start = std::time::Instant::now();
        let snapshot = Snapshot::build(&self.base_dir)?;
        let count = snapshot.index.len();

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);

        tracing::info!(
            "Snapshot rebuilt with {} posts in {:.2}s",
            count,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }
}

/// Calculate a hash for file content
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Get file modification time as nanoseconds since the epoch
fn get_mtime(path: &Path) -> Result<u128> {
    let metadata = fs::metadata(path)?;
    let mtime = metadata.modified()?;
    Ok(mtime
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos())
}

/// Fingerprint of the content tree (paths, sizes, mtimes) and the config file
pub fn fingerprint(blog: &Blog) -> Result<u64> {
    let mut hasher = DefaultHasher::new();

    let config_path = blog.config_path();
    if config_path.exists() {
        hash_content(&fs::read_to_string(&config_path)?).hash(&mut hasher);
    }

    // Collect and sort paths for deterministic ordering
    let mut paths: Vec<_> = WalkDir::new(&blog.content_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();

    for path in paths {
        path.to_string_lossy().hash(&mut hasher);
        if let Ok(metadata) = fs::metadata(&path) {
            metadata.len().hash(&mut hasher);
        }
        get_mtime(&path).unwrap_or_default().hash(&mut hasher);
    }

    Ok(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "content_dir: posts\npublic_dir: out\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("posts/notes")).unwrap();
        fs::write(
            dir.path().join("posts/notes/first.md"),
            "---\ntitle: First\npubDate: 2024-01-01\n---\nbody\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_refresh_without_changes_keeps_snapshot() {
        let dir = site();
        let cache = SnapshotCache::new(dir.path()).unwrap();
        let before = cache.snapshot();
        assert!(!cache.refresh().unwrap());
        assert!(Arc::ptr_eq(&before, &cache.snapshot()));
    }

    #[test]
    fn test_refresh_picks_up_new_post() {
        let dir = site();
        let cache = SnapshotCache::new(dir.path()).unwrap();
        let before = cache.snapshot();
        assert_eq!(before.index.len(), 1);

        fs::write(
            dir.path().join("posts/notes/second.md"),
            "---\ntitle: Second\npubDate: 2024-02-01\n---\n",
        )
        .unwrap();

        assert!(cache.refresh().unwrap());
        let after = cache.snapshot();
        assert!(after.built_at >= before.built_at);
        assert_eq!(after.index.len(), 2);
        assert_eq!(after.index.all_posts()[0].title, "Second");
        // readers holding the old snapshot still see a consistent view
        assert_eq!(before.index.len(), 1);
    }

    #[test]
    fn test_missing_content_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "content_dir: nowhere\n").unwrap();
        assert!(SnapshotCache::new(dir.path()).is_err());
    }

    #[test]
    fn test_hash_content() {
        assert_eq!(hash_content("a"), hash_content("a"));
        assert_ne!(hash_content("a"), hash_content("b"));
    }
}
