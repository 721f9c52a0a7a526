//! API error handling for the drive HTTP surface.
//!
//! Errors are answered with a status code and a short plain-text message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::DriveError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Not found (404).
    NotFound,
    /// Conflict (409).
    Conflict,
    /// Payload too large (413).
    PayloadTooLarge,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status_code(), self.message).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<DriveError> for ApiError {
    fn from(err: DriveError) -> Self {
        match err {
            DriveError::InvalidName(_) => {
                ApiError::bad_request("Name must contain only letters and digits")
            }
            DriveError::InvalidFileName(_) => ApiError::bad_request("Invalid file name"),
            DriveError::MissingParameter(param) => {
                ApiError::bad_request(format!("Missing parameter: {param}"))
            }
            DriveError::NotFound(_) => ApiError::not_found("File or folder not found"),
            DriveError::ParentNotFound(_) => ApiError::not_found("Parent folder not found"),
            DriveError::AlreadyExists(_) => ApiError::conflict("Folder already exists"),
            DriveError::NoFileProvided => ApiError::bad_request("No file provided"),
            DriveError::PayloadTooLarge => {
                ApiError::new(ErrorCode::PayloadTooLarge, "File too large")
            }
            DriveError::Multipart(msg) => {
                tracing::warn!("Rejected upload body: {}", msg);
                ApiError::bad_request("Invalid multipart data")
            }
            err @ (DriveError::Io(_) | DriveError::Config(_)) => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal("Internal server error")
            }
        }
    }
}
