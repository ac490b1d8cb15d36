//! Build route data

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::Blog;

/// Load every post and write the route data into the public directory
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let index = blog.load_index()?;
    tracing::info!("Loaded {} posts, {} tags", index.len(), index.tags().len());

    let generator = Generator::new(blog);
    let written = generator.generate(&index)?;

    tracing::info!(
        "Generated {} files into {:?} in {:.2}s",
        written,
        generator.public_dir(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Watch the content tree and config file, rebuilding on change
pub async fn watch(blog: &Blog) -> Result<()> {
    let blog = blog.clone();
    tokio::task::spawn_blocking(move || watch_blocking(&blog)).await?
}

fn watch_blocking(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&blog.content_dir, notify::RecursiveMode::Recursive)?;
    let config_path = blog.config_path();
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", blog.content_dir);

    let mut pending = false;
    let mut last_event = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                pending = true;
                last_event = Instant::now();
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Rebuild once the burst of events has settled
                if pending && last_event.elapsed() > Duration::from_millis(500) {
                    pending = false;
                    tracing::info!("Content changed, rebuilding...");
                    // Reload so config edits take effect
                    let result = Blog::new(&blog.base_dir).and_then(|blog| run(&blog));
                    if let Err(e) = result {
                        tracing::error!("Build failed: {:#}", e);
                    }
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_writes_public_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "content_dir: posts\n").unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(
            dir.path().join("posts/hello.md"),
            "---\ntitle: Hello\npubDate: 2024-05-01\n---\nhi\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        run(&blog).unwrap();
        assert!(dir.path().join("public/posts/hello.json").is_file());
        assert!(dir.path().join("public/page/1.json").is_file());
    }

    #[test]
    fn test_run_fails_without_content_root() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(run(&blog).is_err());
    }
}
