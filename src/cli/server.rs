//! HTTP server mode exposing the orchestration trigger

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::orchestrate::OrchestrationHandler;

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    handler: Arc<OrchestrationHandler>,
}

/// Build the router (separate from `serve` so it can be driven in tests)
pub fn router(handler: Arc<OrchestrationHandler>) -> Router {
    let state = AppState { handler };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/trigger", post(trigger))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(handler: Arc<OrchestrationHandler>, port: u16) -> Result<()> {
    let app = router(handler);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Run one orchestration invocation
///
/// The body is the trigger payload. It is only logged, so anything that is
/// not JSON is passed through as a string.
async fn trigger(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };

    let response = state.handler.invoke(&payload).await;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(response))
}
