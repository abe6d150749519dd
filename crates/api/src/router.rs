//! HTTP service: routes, CORS and the listener loop

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::commands::{duplicate_events, get_event, health, list_events, preview_duplicates};
use crate::context::AppContext;

pub const HEALTH_ENDPOINT: &str = "/api/health";
pub const EVENTS_ENDPOINT: &str = "/api/events";
pub const EVENT_ENDPOINT: &str = "/api/events/{id}";
pub const DUPLICATE_ENDPOINT: &str = "/api/events/duplicate";
pub const PREVIEW_ENDPOINT: &str = "/api/events/duplicate/preview";

/// Build the service router over `ctx`.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route(HEALTH_ENDPOINT, get(health))
        .route(EVENTS_ENDPOINT, get(list_events))
        .route(DUPLICATE_ENDPOINT, post(duplicate_events))
        .route(PREVIEW_ENDPOINT, post(preview_duplicates))
        .route(EVENT_ENDPOINT, get(get_event))
        .fallback(not_found)
        .layer(middleware::from_fn(cors))
        .with_state(ctx)
}

/// Serve until Ctrl-C.
///
/// # Errors
/// Fails if the address cannot be bound or the server stops unexpectedly.
pub async fn run_server(ctx: Arc<AppContext>, addr: SocketAddr) -> Result<()> {
    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
    let local_addr = listener.local_addr().context("failed to resolve listen address")?;
    info!(%local_addr, "EventForge service listening");

    axum::serve(listener, build_router(ctx))
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await
        .context("HTTP service exited unexpectedly")?;

    info!("EventForge service stopped");
    Ok(())
}

/// Resolves when `signal` fires. Never resolves if the handler could not be
/// installed, so the service keeps running.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(error = %e, "Failed to install Ctrl-C handler; stop the process to shut down");
        std::future::pending::<()>().await;
    }
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

/// Allow any origin; preflight requests are answered here.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("content-type"));
    response
}
