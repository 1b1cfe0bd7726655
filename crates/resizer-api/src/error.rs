//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Library errors
//! (`StorageError`, `ValidationError`, `ProcessingError`) convert into
//! `HttpAppError` here so they render consistently.
//!
//! The body rendered here never carries `details`. The full body travels in
//! an `ErrorBody` response extension and the error body middleware decides,
//! from the loaded configuration, whether to expose it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use resizer_core::{AppError, ErrorMetadata, LogLevel};
use resizer_infra::ErrorResponse;
use resizer_processing::{CodecError, ProcessingError, ValidationError};
use resizer_storage::StorageError;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from resizer-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Error body including `details` for non-sensitive errors.
#[derive(Debug, Clone)]
pub struct ErrorBody(pub ErrorResponse);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse {
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
            details: None,
        };
        let full = ErrorResponse {
            details: (!app_error.is_sensitive()).then(|| app_error.to_string()),
            ..body.clone()
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorBody(full));
        response
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::NotFound(msg),
            StorageError::WriteFailed(msg) => AppError::StorageFailure(msg),
            StorageError::ReadFailed(msg) => AppError::StorageFailure(msg),
            StorageError::DeleteFailed(msg) => AppError::StorageFailure(msg),
            StorageError::IoError(err) => AppError::StorageFailure(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { size, max } => {
                AppError::PayloadTooLarge(format!("{} bytes exceeds max {} bytes", size, max))
            }
            ValidationError::InvalidContentType {
                content_type,
                allowed,
            } => AppError::InvalidInput(format!(
                "Invalid content type '{}', allowed: {:?}",
                content_type, allowed
            )),
            ValidationError::EmptyFile => AppError::MissingFile("Uploaded file is empty".to_string()),
        };
        HttpAppError(app)
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        let app = match err {
            ProcessingError::Codec(CodecError::Decode(msg)) => {
                AppError::EncodeFailure(format!("Could not decode image: {}", msg))
            }
            ProcessingError::Codec(CodecError::Encode(msg)) => AppError::EncodeFailure(msg),
            ProcessingError::TaskFailed(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}
