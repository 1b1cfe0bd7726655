//! Resizer API Library
//!
//! This crate provides the HTTP handlers and application setup for the resize service.

pub mod constants;
pub mod error;
mod handlers;
pub mod middleware;
pub mod setup;
pub mod state;
mod utils;

pub use error::HttpAppError;
pub use state::AppState;
