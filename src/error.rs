//! Error types for the certificate endpoint

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::pdf::RenderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Malformed multipart request: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Error generating certificate: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => {
                tracing::warn!(reason = %msg, "Rejected certificate request");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Multipart(e) => {
                tracing::warn!(error = %e, "Malformed multipart body");
                // 413 when the body limit was hit, 400 for anything else.
                (e.status(), self.to_string())
            }
            AppError::Render(e) => {
                tracing::error!(error = %e, "Error generating certificate");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error generating certificate".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!(error = %e, "Failed to store upload");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store uploaded image".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
