//! Error handling for the webhook subsystem.
//!
//! Every fallible operation returns [`WebhookError`]. When surfaced through
//! the HTTP API each variant maps onto a status code and a stable
//! machine-readable error code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::audit::AuditError;
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, WebhookError>;

/// Errors raised by the registry, dispatcher, and delivery executor.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Webhook not found")]
    WebhookNotFound,

    #[error("Webhook limit ({limit}) reached for tenant")]
    WebhookLimitExceeded { limit: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("SSRF protection: {0}")]
    SsrfDetected(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WebhookError {
    /// HTTP status and stable error code for the response body.
    fn http_parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::WebhookNotFound => (StatusCode::NOT_FOUND, "webhook_not_found"),
            Self::WebhookLimitExceeded { .. } => {
                (StatusCode::CONFLICT, "webhook_limit_exceeded")
            }
            Self::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "invalid_url"),
            Self::SsrfDetected(_) => (StatusCode::BAD_REQUEST, "ssrf_detected"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
            Self::Audit(_) => (StatusCode::INTERNAL_SERVER_ERROR, "audit_error"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

/// Error payload returned by every webhook API endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status: u16,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, code) = self.http_parts();

        let body = ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}
