// src/serve/server.rs

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::build::BuildStamp;
use crate::config::ServeSection;

/// Resource path polled by browsers to detect rebuilds.
pub const BUILD_TIMESTAMP_ROUTE: &str = "/.build_timestamp";

/// Sent on every response. The whole point of this server is that clients
/// re-fetch after each rebuild, so nothing may be cached.
const NO_CACHE: &str = "no-store, no-cache, must-revalidate";

/// Shared state for the reload server: the directory it serves and the
/// timestamp file it answers polls from.
#[derive(Clone)]
pub struct ServeState {
    root: PathBuf,
    stamp: BuildStamp,
}

impl ServeState {
    pub fn new(root: impl Into<PathBuf>, stamp: BuildStamp) -> Self {
        Self {
            root: root.into(),
            stamp,
        }
    }
}

pub fn router(state: ServeState) -> Router {
    Router::new()
        .route(BUILD_TIMESTAMP_ROUTE, get(build_timestamp))
        .fallback(static_file)
        .with_state(state)
}

/// Bind the listener up front so a port conflict fails startup with a
/// clear diagnostic instead of surfacing later from a background task.
pub async fn bind(cfg: &ServeSection) -> Result<TcpListener> {
    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("binding reload server to {addr}"))?;
    info!("reload server listening on http://{addr}/");
    Ok(listener)
}

/// Serve until the shutdown signal fires, then release the port.
pub async fn serve(
    listener: TcpListener,
    state: ServeState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await
        .context("reload server failed")?;

    info!("reload server stopped");
    Ok(())
}

/// `GET /.build_timestamp` — always 200, plain text, `"0"` when the file
/// is absent or unreadable.
async fn build_timestamp(State(state): State<ServeState>) -> Response {
    let body = state.stamp.read_or_zero();
    debug!(%body, "served build timestamp");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, NO_CACHE),
        ],
        body,
    )
        .into_response()
}

/// Static file fallback. Per-request access logging stays at debug so the
/// default `info` level prints nothing while a browser polls.
async fn static_file(State(state): State<ServeState>, uri: Uri) -> Response {
    let Some(path) = resolve_request_path(&state.root, uri.path()) else {
        debug!(path = uri.path(), status = 404, "request rejected");
        return not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!(path = ?path, status = 200, bytes = bytes.len(), "served file");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type_for(&path)),
                    (header::CACHE_CONTROL, NO_CACHE),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            debug!(path = ?path, error = %err, status = 404, "file not served");
            not_found()
        }
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, NO_CACHE),
        ],
        "404 not found",
    )
        .into_response()
}

/// Map a request path to a file under `root`, refusing traversal outside
/// it. Directory requests resolve to their `index.html`.
fn resolve_request_path(root: &Path, raw: &str) -> Option<PathBuf> {
    let decoded = percent_decode(raw)?;
    let rel = decoded.trim_start_matches('/');

    let mut path = root.to_path_buf();
    for component in Path::new(rel).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            // `..` and absolute components would escape the served tree.
            _ => return None,
        }
    }

    if path.is_dir() {
        path.push("index.html");
    }
    Some(path)
}

fn percent_decode(s: &str) -> Option<String> {
    if !s.contains('%') {
        return Some(s.to_string());
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff2") => "font/woff2",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
