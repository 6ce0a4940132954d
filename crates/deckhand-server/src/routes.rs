//! HTTP routes for deckhand server.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::dispatch::Dispatcher;

/// Application state shared across handlers.
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/mcp", post(rpc_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler.
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "work_root": state.dispatcher.deck().work_root().display().to_string(),
    }))
}

/// One JSON-RPC message per POST. Notifications are acknowledged with 202.
async fn rpc_handler(State(state): State<Arc<AppState>>, body: String) -> Response {
    match state.dispatcher.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
