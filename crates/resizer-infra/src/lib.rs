//! Resizer Infrastructure Library
//!
//! Shared infrastructure used by the HTTP service:
//! - Telemetry initialization (tracing subscriber)
//! - Error response body
//! - Retention Sweeper for expired output artifacts

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

#[cfg(feature = "cleanup")]
pub mod cleanup;

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

pub use error::ErrorResponse;

#[cfg(feature = "cleanup")]
pub use cleanup::{RetentionSweeper, SweepReport, SweeperHandle};
