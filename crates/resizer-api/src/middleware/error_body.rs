use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use resizer_core::AppError;
use std::sync::Arc;

use crate::error::{ErrorBody, HttpAppError};

/// Error body configuration
#[derive(Clone, Debug)]
pub struct ErrorBodyConfig {
    pub is_production: bool,
    pub max_upload_bytes: usize,
}

impl ErrorBodyConfig {
    pub fn new(is_production: bool, max_upload_bytes: usize) -> Self {
        Self {
            is_production,
            max_upload_bytes,
        }
    }
}

/// Error body middleware
///
/// Gives every error response the JSON `{error, code, details?}` shape. A 413
/// issued by the body-limit layer is replaced with the `PAYLOAD_TOO_LARGE`
/// body, and `details` is added outside production.
pub async fn error_body_middleware(
    State(config): State<Arc<ErrorBodyConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE
        && response.extensions().get::<ErrorBody>().is_none()
    {
        response = HttpAppError(AppError::PayloadTooLarge(format!(
            "Upload exceeds the maximum of {} bytes",
            config.max_upload_bytes
        )))
        .into_response();
    }

    let Some(ErrorBody(body)) = response.extensions_mut().remove::<ErrorBody>() else {
        return response;
    };
    if config.is_production || body.details.is_none() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    (parts, Json(body)).into_response()
}
