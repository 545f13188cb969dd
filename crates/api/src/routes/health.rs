use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

/// Health check endpoint. Reports the last recorded signal, `null` before the
/// first completed cycle.
async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let last_signal = state.orchestrator.last_signal();
    Json(json!({
        "status": "ok",
        "lastSignal": last_signal.map(|s| s.to_string()),
    }))
}
