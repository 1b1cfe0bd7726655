use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use resizer_core::constants::{DOWNLOAD_FILENAME, OUTPUT_CONTENT_TYPE};

use crate::error::HttpAppError;
use crate::state::AppState;

/// Serve a stored artifact as a file download with a fixed name
pub async fn download_image(
    Path(filename): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let data = state.storage.get(&filename).await?;

    tracing::debug!(key = %filename, size_bytes = data.len(), "Serving download");

    Ok((
        [
            (header::CONTENT_TYPE, OUTPUT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
            ),
        ],
        data,
    ))
}
