use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use crate::state::AppState;

pub async fn index() -> &'static str {
    "API is working!"
}

/// 503 until certificate fonts are available.
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    if state.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "fonts unavailable")
    }
}
