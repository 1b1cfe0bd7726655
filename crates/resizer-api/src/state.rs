//! Application state shared by all handlers.

use resizer_core::{Config, UnitConverter};
use resizer_processing::{ResizePipeline, UploadValidator};
use resizer_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub converter: UnitConverter,
    pub pipeline: ResizePipeline,
    pub validator: UploadValidator,
}

impl AppState {
    /// Absolute URL for an artifact under one of the retrieval routes.
    pub fn artifact_url(&self, route: &str, filename: &str) -> String {
        format!("{}{}/{}", self.config.public_base_url(), route, filename)
    }
}
