//! # HTTP API
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | liveness message |
//! | `POST /generate` | JSON [`GenerateRequest`](crate::types::GenerateRequest) |
//! | `POST /generate-with-file` | multipart upload plus the same fields |
//! | `GET /download/:filename` | a generated feature file or script |
//!
//! Generation runs on its own task and is awaited under the configured request
//! timeout. When the timeout fires the caller gets `408` and the task is left
//! to finish in the background.

mod handlers;

use crate::dispatcher::Dispatcher;
use crate::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::header;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use handlers::{status_for, LIVENESS_MESSAGE};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub timeout: Duration,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, timeout: Duration) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            timeout,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(handlers::root))
        .route("/generate", post(handlers::generate))
        .route("/generate-with-file", post(handlers::generate_with_file))
        .route("/download/:filename", get(handlers::download))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %addr,
        timeout_secs = state.timeout.as_secs(),
        "QA test generation API listening"
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}
