//! Resizer Storage Library
//!
//! This crate provides the Output Store: the `Storage` trait and its local
//! filesystem implementation.
//!
//! # Artifact naming
//!
//! Every stored output gets a fresh random id and lives under a flat
//! namespace as `output-{id}.jpg`. Names are never reused, and anything that
//! does not match that shape is treated as unknown. Naming is centralized in
//! the `keys` module so lookups and listings agree.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{OutputArtifact, Storage, StorageError, StorageResult};
