//! Retention Sweeper
//!
//! Periodically removes output artifacts older than the retention window.

mod service;

pub use service::{RetentionSweeper, SweepReport, SweeperHandle};
