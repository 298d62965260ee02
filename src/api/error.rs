//! Mapping from crate errors to HTTP responses.
//!
//! Client errors carry their message; server errors are logged and answered with a
//! generic message so database details never leak to callers.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

impl Error {
    /// HTTP status this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::Unauthorized | Self::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::EmailTaken { .. } => StatusCode::CONFLICT,
            Self::Config { .. } | Self::Database(_) | Self::PasswordHash(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
