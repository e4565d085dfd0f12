use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard_core::ApiError;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Failure reply of a passthrough endpoint, rendered as `{code, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// Map a failed upstream call. Validation failures keep their messages;
    /// everything else becomes `message`.
    pub fn failed(err: ApiError, message: &str) -> Self {
        match err {
            ApiError::Validation(messages) => GatewayError::InvalidArgument(messages.join(", ")),
            err => {
                warn!(%err, message, "upstream call failed");
                GatewayError::Internal(message.to_string())
            }
        }
    }

    /// Like `failed`, but an upstream 404 becomes `NotFound(not_found)`.
    pub fn lookup(err: ApiError, not_found: &str, message: &str) -> Self {
        if err.is_not_found() {
            return GatewayError::NotFound(not_found.to_string());
        }
        Self::failed(err, message)
    }

    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::NotFound(_) => "NOT_FOUND",
            GatewayError::InvalidArgument(_) => "INVALID_ARGUMENT",
            GatewayError::Unauthenticated(_) => "UNAUTHENTICATED",
            GatewayError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        GatewayError::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = json!({ "code": self.code(), "message": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
