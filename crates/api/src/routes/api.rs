use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use common::HistoryInterval;

use crate::{ApiError, AppState};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/price", get(get_price))
        .route("/api/history", get(get_history))
        .route("/api/strategy", get(get_strategy))
}

// ─── Price ────────────────────────────────────────────────────────────────────

async fn get_price(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let snapshot = state.source.get_current_price().await?;
    Ok(Json(json!({
        "price": snapshot.value.price,
        "change24h": snapshot.value.change_24h_percent,
        "timestamp": snapshot.fetched_at_millis,
        "cached": snapshot.cached,
    })))
}

// ─── History ──────────────────────────────────────────────────────────────────

async fn get_history(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let history = state
        .source
        .get_history(state.history_days, HistoryInterval::Daily)
        .await?;

    Ok(Json(json!({
        "data": history.value,
        "timestamp": history.fetched_at_millis,
        "cached": history.cached,
    })))
}

// ─── Strategy ─────────────────────────────────────────────────────────────────

async fn get_strategy(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let result = state.orchestrator.evaluate_cycle().await?;
    let r = result.value;
    Ok(Json(json!({
        "signal": r.signal,
        "shortMA": r.short_ma,
        "longMA": r.long_ma,
        "price": r.price,
        "timestamp": r.timestamp_millis,
        "cached": result.cached,
    })))
}
