use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cadenza_client::ApiClientError;
use cadenza_core::error::CoreError;
use cadenza_core::forms::FocusTarget;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ApiClientError`] for upstream
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cadenza_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The upstream API call failed.
    #[error(transparent)]
    Upstream(#[from] ApiClientError),

    /// A form submit was blocked by field validation.
    #[error("Form rejected: {message}")]
    FormRejected {
        message: &'static str,
        focus: FocusTarget,
        fields: BTreeMap<&'static str, String>,
    },

    /// A valid form could not be delivered upstream.
    #[error("Submission failed: {0}")]
    SubmissionFailed(&'static str),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Upstream errors ---
            AppError::Upstream(err) => classify_upstream_error(err),

            // --- Form errors carry per-field detail ---
            AppError::FormRejected {
                message,
                focus,
                fields,
            } => {
                let body = json!({
                    "error": message,
                    "code": "VALIDATION_ERROR",
                    "fields": fields,
                    "focus": focus,
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response();
            }
            AppError::SubmissionFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                "SUBMISSION_FAILED",
                (*msg).to_string(),
            ),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an upstream failure into an HTTP status, error code, and message.
///
/// - 404 maps to 404, 401/403 pass through, 400/422 map to 400.
/// - Timeouts map to 504, cancellation to 503.
/// - Everything else maps to 502 with a sanitized message.
fn classify_upstream_error(err: &ApiClientError) -> (StatusCode, &'static str, String) {
    match err {
        ApiClientError::Status { status: 404, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        ApiClientError::Status { status: 401, .. } => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Not signed in".to_string(),
        ),
        ApiClientError::Status { status: 403, .. } => (
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "Not allowed".to_string(),
        ),
        ApiClientError::Status {
            status: 400 | 422,
            body,
        } => (StatusCode::BAD_REQUEST, "BAD_REQUEST", body.clone()),
        ApiClientError::Request(e) if e.is_timeout() => {
            tracing::warn!(error = %e, "Upstream request timed out");
            (
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                "The school API did not respond in time".to_string(),
            )
        }
        ApiClientError::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            "CANCELLED",
            "The request was cancelled".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Upstream error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The school API is unavailable".to_string(),
            )
        }
    }
}
