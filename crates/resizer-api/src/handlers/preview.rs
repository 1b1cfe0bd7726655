use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use resizer_core::constants::OUTPUT_CONTENT_TYPE;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Serve a stored artifact inline
pub async fn preview_image(
    Path(filename): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let data = state.storage.get(&filename).await?;

    Ok((
        [
            (header::CONTENT_TYPE, OUTPUT_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        data,
    ))
}
