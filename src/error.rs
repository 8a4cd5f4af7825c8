use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error. Every variant except `Internal` is operational:
/// the message is safe to show to the client as-is.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Folds every violated field into the single message the validation
    /// layer reports.
    pub fn invalid_input(violations: Vec<String>) -> Self {
        Self::Validation(format!("Invalid input data. {}", violations.join(". ")))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // Duplicate email registers as a plain 400, matching the
            // public API contract rather than 409.
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // 4xx -> "fail", 5xx -> "error" in the response envelope.
        let label = if status.is_client_error() { "fail" } else { "error" };

        let message = match &self {
            Self::Internal(err) => {
                tracing::error!(error = ?err, "unexpected error");
                if crate::config::dev_mode() {
                    format!("{err:#}")
                } else {
                    "Something went very wrong!".to_string()
                }
            }
            operational => operational.to_string(),
        };

        (status, Json(json!({ "status": label, "message": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
