//! JSON API server with content reload
//!
//! Serves the route data straight from the in-memory snapshot, so edits are
//! visible without a rebuild. Everything outside `/api` comes from the
//! public directory.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cache::SnapshotCache;
use crate::generator::{category_overview, category_page, feed_page, post_page, tag_entries, tag_page};
use crate::Blog;

/// Server state
#[derive(Clone)]
pub struct ServerState {
    cache: Arc<SnapshotCache>,
}

impl ServerState {
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self { cache }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    page: Option<usize>,
}

impl PageQuery {
    fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

#[derive(Debug, Default, Deserialize)]
struct PostQuery {
    tag: Option<String>,
}

/// The API routes, with static files from `public_dir` as fallback
pub fn router(state: ServerState, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/*slug", get(show_post))
        .route("/api/tags", get(list_tags))
        .route("/api/tags/:tag", get(show_tag))
        .route("/api/categories", get(list_categories))
        .route("/api/categories/*path", get(show_category))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server. With `watch`, content changes swap in a fresh snapshot.
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let cache = Arc::new(SnapshotCache::new(&blog.base_dir)?);
    let app = router(ServerState::new(cache.clone()), blog.public_dir.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let content_dir = blog.content_dir.clone();
        let config_path = blog.config_path();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_refresh(content_dir, config_path, cache) {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Refresh the snapshot whenever the content tree or config file changes
fn watch_and_refresh(
    content_dir: PathBuf,
    config_path: PathBuf,
    cache: Arc<SnapshotCache>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    debouncer
        .watcher()
        .watch(&content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", content_dir);

    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git")
                        && !path_str.contains(".DS_Store")
                        && !path_str.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                for event in &events {
                    tracing::debug!("File changed: {}", event.path.display());
                }
                // A failed refresh keeps serving the previous snapshot
                match cache.refresh() {
                    Ok(true) => tracing::info!("Content reloaded"),
                    Ok(false) => {}
                    Err(e) => tracing::error!("Reload failed: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("{} not found", what)).into_response()
}

async fn list_posts(State(state): State<ServerState>, Query(query): Query<PageQuery>) -> Response {
    let snapshot = state.cache.snapshot();
    match feed_page(&snapshot.index, &snapshot.blog.config, query.page()) {
        Some(page) => Json(page).into_response(),
        None => not_found("Page"),
    }
}

async fn show_post(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(query): Query<PostQuery>,
) -> Response {
    let snapshot = state.cache.snapshot();
    let slug = slug.trim_matches('/');
    let tag = query.tag.as_deref().filter(|t| !t.is_empty());
    match post_page(&snapshot.index, &snapshot.blog.config, slug, tag) {
        Some(page) => Json(page).into_response(),
        None => not_found("Post"),
    }
}

async fn list_tags(State(state): State<ServerState>) -> Response {
    let snapshot = state.cache.snapshot();
    Json(tag_entries(&snapshot.index, &snapshot.blog.config)).into_response()
}

async fn show_tag(
    State(state): State<ServerState>,
    Path(tag): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let snapshot = state.cache.snapshot();
    match tag_page(&snapshot.index, &snapshot.blog.config, &tag, query.page()) {
        Some(page) => Json(page).into_response(),
        None => not_found("Tag page"),
    }
}

async fn list_categories(State(state): State<ServerState>) -> Response {
    let snapshot = state.cache.snapshot();
    Json(category_overview(&snapshot.index)).into_response()
}

async fn show_category(
    State(state): State<ServerState>,
    Path(path): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let snapshot = state.cache.snapshot();
    match category_page(&snapshot.index, &snapshot.blog.config, &path, query.page()) {
        Some(page) => Json(page).into_response(),
        None => not_found("Category page"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn state() -> (TempDir, ServerState) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "content_dir: posts\n").unwrap();
        fs::create_dir_all(dir.path().join("posts/life/digital")).unwrap();
        fs::write(
            dir.path().join("posts/life/digital/nomad.md"),
            "---\ntitle: Nomad\npubDate: 2024-04-01\ntags: [travel]\n---\nhi\n",
        )
        .unwrap();
        let cache = Arc::new(SnapshotCache::new(dir.path()).unwrap());
        (dir, ServerState::new(cache))
    }

    #[tokio::test]
    async fn test_show_post() {
        let (_dir, state) = state();
        let found = show_post(
            State(state.clone()),
            Path("life/digital/nomad".to_string()),
            Query(PostQuery::default()),
        )
        .await;
        assert_eq!(found.status(), StatusCode::OK);

        let missing = show_post(
            State(state),
            Path("missing-slug".to_string()),
            Query(PostQuery { tag: Some("travel".to_string()) }),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_listings() {
        let (_dir, state) = state();
        let page = list_posts(State(state.clone()), Query(PageQuery::default())).await;
        assert_eq!(page.status(), StatusCode::OK);

        let beyond = list_posts(State(state.clone()), Query(PageQuery { page: Some(2) })).await;
        assert_eq!(beyond.status(), StatusCode::NOT_FOUND);

        let tag = show_tag(
            State(state.clone()),
            Path("travel".to_string()),
            Query(PageQuery::default()),
        )
        .await;
        assert_eq!(tag.status(), StatusCode::OK);

        let category = show_category(
            State(state.clone()),
            Path("life".to_string()),
            Query(PageQuery::default()),
        )
        .await;
        assert_eq!(category.status(), StatusCode::OK);

        assert_eq!(list_tags(State(state.clone())).await.status(), StatusCode::OK);
        assert_eq!(list_categories(State(state)).await.status(), StatusCode::OK);
    }

    #[test]
    fn test_router_builds() {
        let (dir, state) = state();
        let _router = router(state, dir.path().join("public"));
    }
}
