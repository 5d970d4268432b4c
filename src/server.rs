//! HTTP front end for the report.

use crate::error::{Result, ShowTableError};
use crate::service::{ReportParams, ReportService};
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

/// Shared state for the report route.
#[derive(Clone)]
struct AppState {
    service: Arc<ReportService>,
    path: Arc<str>,
}

/// Builds the router serving the report at `path`.
pub fn router(service: Arc<ReportService>, path: &str) -> Router {
    let path = normalize_path(path);
    let state = AppState {
        service,
        path: Arc::from(path.as_str()),
    };

    Router::new()
        .route(&path, get(show_report))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn show_report(State(state): State<AppState>, Query(params): Query<ReportParams>) -> Response {
    let response = state.service.handle(&params, &state.path).await;

    (
        response.status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        )],
        response.body,
    )
        .into_response()
}

/// Serves until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ShowTableError::internal(format!("Server error: {e}")))
}

/// Binds `addr` and serves the router on it.
pub async fn bind_and_serve(addr: &str, router: Router) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ShowTableError::config(format!("Cannot listen on {addr}: {e}")))?;
    serve(listener, router).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
