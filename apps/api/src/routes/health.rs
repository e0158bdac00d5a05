use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
/// Service name, version and where to look next.
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Prospect Research API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
        "default_max_profiles": state.config.desired_profiles
    }))
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.config.environment,
        "desired_profiles": state.config.desired_profiles
    }))
}
