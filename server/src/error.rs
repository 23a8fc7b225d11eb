//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unknown and malformed ids collapse into this one error; the caller
    /// cannot tell them apart.
    #[error("No such song")]
    NoSuchSong,

    /// Create validation failed; carries every empty field name.
    #[error("Please fill in all fields")]
    EmptyFields(Vec<String>),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(rename = "emptyFields", skip_serializing_if = "Option::is_none")]
    empty_fields: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, empty_fields) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    None,
                )
            }
            AppError::NoSuchSong => {
                (StatusCode::BAD_REQUEST, "No such song".to_string(), None)
            }
            AppError::EmptyFields(fields) => (
                StatusCode::BAD_REQUEST,
                "Please fill in all fields".to_string(),
                Some(fields),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            empty_fields,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
