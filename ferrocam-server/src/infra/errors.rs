use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use ferrocam_core::CameraError;
use ferrocam_model::ErrorResponse;

pub type AppResult<T> = Result<T, AppError>;

/// How an error body is rendered. Capture routes answer in plain text,
/// configuration routes in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBody {
    Json,
    Text,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub body: ErrorBody,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: ErrorBody::Json,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn malformed_body() -> Self {
        Self::bad_request("Invalid JSON in request body")
    }

    pub fn as_text(mut self) -> Self {
        self.body = ErrorBody::Text;
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.body {
            ErrorBody::Json => (
                self.status,
                Json(ErrorResponse {
                    error: self.message,
                }),
            )
                .into_response(),
            ErrorBody::Text => (self.status, self.message).into_response(),
        }
    }
}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::MissingParameter(name) => {
                Self::bad_request(format!("Missing {name} parameter"))
            }
            CameraError::NotFound(_) => Self::not_found("Camera not found"),
            CameraError::InvalidFormat { .. } => {
                Self::bad_request("Invalid image format")
            }
            CameraError::InvalidQuality { .. } => {
                Self::bad_request("Invalid quality")
            }
            CameraError::Capture(reason) => {
                tracing::error!(%reason, "raw capture failed");
                Self::internal("Capture failed")
            }
            other => Self::internal(other.to_string()),
        }
    }
}
