//! Error types for Tempdrive.

use thiserror::Error;

/// Common error type for Tempdrive.
#[derive(Error, Debug)]
pub enum DriveError {
    /// Name does not match the alphanumeric naming policy.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Uploaded filename is not a single path component.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    /// A required request parameter is absent or empty.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// Target entry does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Named parent folder does not exist.
    #[error("parent folder {0} not found")]
    ParentNotFound(String),

    /// Create target is already present.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Upload request carried no file part.
    #[error("no file provided")]
    NoFileProvided,

    /// Upload body could not be decoded.
    #[error("multipart error: {0}")]
    Multipart(String),

    /// Upload body exceeded the configured size limit.
    #[error("upload exceeds the size limit")]
    PayloadTooLarge,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for Tempdrive operations.
pub type Result<T> = std::result::Result<T, DriveError>;
