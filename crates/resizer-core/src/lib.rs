//! Resizer Core Library
//!
//! This crate provides the domain types, error taxonomy, configuration, unit
//! conversion, and quality request types shared across all Resizer components.

pub mod config;
pub mod constants;
pub mod error;
pub mod quality;
pub mod units;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ResizeSettings};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use quality::{PresetTable, QualityPreset, QualitySpec, SearchBounds, SizeStrategy};
pub use units::{ConversionFactors, PixelDimensions, Unit, UnitConverter};
