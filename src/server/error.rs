use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors surfaced by the catalogue core.
///
/// `Clone` so a single failed refresh can be handed to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("upstream response malformed: {0}")]
    UpstreamMalformed(String),

    #[error("no match titled {0:?}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

// ── Error helpers ─────────────────────────────────────────────────────────────

fn internal(msg: impl std::fmt::Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": msg.to_string() })),
    )
        .into_response()
}

fn bad_request(msg: impl std::fmt::Display) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": msg.to_string() })),
    )
        .into_response()
}

fn not_found(msg: impl std::fmt::Display) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": msg.to_string() })),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::UpstreamUnreachable(_) | AppError::UpstreamMalformed(_) => {
                tracing::error!(error = %self, "server error");
                internal("Something went wrong")
            }
            AppError::NotFound(_) => not_found("Match not found"),
            AppError::BadRequest(msg) => bad_request(msg),
        }
    }
}
