use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_upload_form;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    #[serde(rename = "estimatedSizeKB")]
    pub estimated_size_kb: u64,
    pub quality: u8,
    pub width: u32,
    pub height: u32,
}

/// Dry run of the upload pipeline: same input, nothing is stored.
pub async fn estimate_size(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<EstimateResponse>, HttpAppError> {
    let form = extract_upload_form(multipart).await?;
    let job = form.into_job(
        &state.converter,
        &state.validator,
        &state.config.resize.target_kb_range(),
    )?;

    let output = state.pipeline.run(job).await?;

    Ok(Json(EstimateResponse {
        estimated_size_kb: output.resolved.size_kb(),
        quality: output.resolved.quality,
        width: output.dimensions.width,
        height: output.dimensions.height,
    }))
}
