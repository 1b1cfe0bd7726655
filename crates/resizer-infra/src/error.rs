//! HTTP error response body
//!
//! The `IntoResponse` conversion lives in `resizer-api`; this crate only owns
//! the wire shape so every surface renders errors identically.

use serde::Serialize;

/// Standard error response format for HTTP APIs
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
