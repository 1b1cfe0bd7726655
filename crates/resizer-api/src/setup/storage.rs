//! Storage setup and initialization

use anyhow::{Context, Result};
use resizer_core::Config;
use resizer_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Create the Output Store rooted at `OUTPUT_DIR`, creating the directory if needed.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(output_dir = %config.output_dir.display(), "Initializing output storage...");

    let storage = LocalStorage::new(&config.output_dir)
        .await
        .with_context(|| format!("Failed to open output directory {}", config.output_dir.display()))?;

    Ok(Arc::new(storage))
}
