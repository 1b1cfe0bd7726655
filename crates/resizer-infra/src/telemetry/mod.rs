//! Tracing initialization
//!
//! `RUST_LOG` controls filtering; `LOG_FORMAT=json` switches to structured output.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry};
