//! Error types module
//!
//! All request-path failures are unified under `AppError`. Each variant
//! self-describes how it should be presented over HTTP through the
//! `ErrorMetadata` trait, so the API layer only renders what it is told.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like oversized uploads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_UNIT")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from the client
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Invalid quality: {0}")]
    InvalidQuality(String),

    #[error("Missing file: {0}")]
    MissingFile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Encode failure: {0}")]
    EncodeFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::StorageFailure(format!("IO error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidUnit(_) => (400, "INVALID_UNIT", false, LogLevel::Debug),
        AppError::InvalidDimension(_) => (400, "INVALID_DIMENSION", false, LogLevel::Debug),
        AppError::InvalidQuality(_) => (400, "INVALID_QUALITY", false, LogLevel::Debug),
        AppError::MissingFile(_) => (400, "MISSING_FILE", false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Warn),
        AppError::EncodeFailure(_) => (500, "ENCODE_FAILURE", false, LogLevel::Error),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::StorageFailure(_) => (500, "STORAGE_FAILURE", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidUnit(_) => "InvalidUnit",
            AppError::InvalidDimension(_) => "InvalidDimension",
            AppError::InvalidQuality(_) => "InvalidQuality",
            AppError::MissingFile(_) => "MissingFile",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::EncodeFailure(_) => "EncodeFailure",
            AppError::NotFound(_) => "NotFound",
            AppError::StorageFailure(_) => "StorageFailure",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Whether the caller sent something unusable (as opposed to a server-side fault).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidUnit(ref msg) => msg.clone(),
            AppError::InvalidDimension(ref msg) => msg.clone(),
            AppError::InvalidQuality(ref msg) => msg.clone(),
            AppError::MissingFile(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::EncodeFailure(_) => "Error processing image".to_string(),
            AppError::NotFound(_) => "File not found".to_string(),
            AppError::StorageFailure(_) => "Internal server error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
