//! Handler error type, rendered as an HTML error page.

use crate::domain::ValidationError;
use crate::storage::StoreError;
use crate::view::render_error;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected input (400). Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request body or query string could not be decoded at all (400).
    #[error("malformed request: {0}")]
    Malformed(String),

    /// Storage failed (500, logged).
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, message) = match self {
            AppError::Validation(e) => {
                tracing::debug!(error = %e, "Rejected request");
                (StatusCode::BAD_REQUEST, "Invalid input", e.to_string())
            }
            AppError::Malformed(detail) => {
                tracing::debug!(%detail, "Malformed request");
                (StatusCode::BAD_REQUEST, "Invalid request", detail)
            }
            AppError::Storage(e) => {
                tracing::error!(error = ?e, "Storage error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "The operation could not be completed. Please try again.".to_string(),
                )
            }
        };

        (status, Html(render_error(title, &message))).into_response()
    }
}
