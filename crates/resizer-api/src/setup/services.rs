//! Service initialization and application state setup

use crate::state::AppState;
use resizer_core::{Config, UnitConverter};
use resizer_infra::{RetentionSweeper, SweeperHandle};
use resizer_processing::{ResizePipeline, UploadValidator};
use resizer_storage::Storage;
use std::sync::Arc;

/// Build the application state from configuration and an Output Store.
pub fn initialize_services(config: &Config, storage: Arc<dyn Storage>) -> Arc<AppState> {
    let resize = &config.resize;

    tracing::info!(
        size_strategy = %resize.size_strategy,
        min_target_kb = resize.min_target_kb,
        max_target_kb = resize.max_target_kb,
        max_output_pixels = resize.max_output_pixels,
        "Initializing resize pipeline"
    );

    Arc::new(AppState {
        config: config.clone(),
        storage,
        converter: UnitConverter::new(resize.factors)
            .with_max_pixels(resize.max_output_pixels),
        pipeline: ResizePipeline::new(resize),
        validator: UploadValidator::new(
            config.max_file_size_bytes,
            config.allowed_content_types.clone(),
        ),
    })
}

/// Start the Retention Sweeper for the lifetime of the server.
pub fn start_sweeper(config: &Config, storage: Arc<dyn Storage>) -> SweeperHandle {
    let sweeper = Arc::new(RetentionSweeper::new(
        storage,
        config.retention,
        config.sweep_interval,
    ));
    let handle = sweeper.start();
    tracing::info!(
        retention_secs = config.retention.as_secs(),
        interval_secs = config.sweep_interval.as_secs(),
        "Started retention sweeper background task"
    );
    handle
}
