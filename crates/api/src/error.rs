use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use common::{Error, FailureKind};

/// Renders a core error as `{ "error": ..., "kind": ... }`.
/// Upstream outages map to 502 so callers can tell them apart from
/// computation failures (500).
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            FailureKind::Upstream => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(json!({ "error": self.0.to_string(), "kind": kind.to_string() })),
        )
            .into_response()
    }
}
