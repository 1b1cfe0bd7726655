//! Application setup and initialization
//!
//! Kept out of main.rs so the integration tests can build the same router.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use resizer_core::Config;
use resizer_infra::SweeperHandle;
use std::sync::Arc;

/// Everything the server needs to run and later shut down.
pub struct App {
    pub state: Arc<AppState>,
    pub router: axum::Router,
    pub sweeper: SweeperHandle,
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<App> {
    resizer_infra::init_telemetry(config.log_format(), config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;

    let state = services::initialize_services(&config, storage.clone());

    let sweeper = services::start_sweeper(&config, storage);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok(App {
        state,
        router,
        sweeper,
    })
}
