use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::constants::{DOWNLOAD_PATH, PREVIEW_PATH};
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_upload_form;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub preview_url: String,
    pub download_url: String,
    pub filename: String,
    #[serde(rename = "actualSizeKB")]
    pub actual_size_kb: u64,
    pub quality: u8,
    pub width: u32,
    pub height: u32,
}

/// Upload image handler
///
/// Resizes the uploaded image to the requested physical size, encodes it at
/// the resolved quality, and stores the result for later preview/download.
///
/// # Errors
/// - `AppError::MissingFile` - No image field, or an empty one
/// - `AppError::InvalidDimension` / `InvalidUnit` / `InvalidQuality` - Bad form fields
/// - `AppError::PayloadTooLarge` - Image exceeds the size limit
/// - `AppError::EncodeFailure` - The image could not be decoded or encoded
/// - `AppError::StorageFailure` - The result could not be persisted
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let form = extract_upload_form(multipart).await?;
    let job = form.into_job(
        &state.converter,
        &state.validator,
        &state.config.resize.target_kb_range(),
    )?;

    let output = state.pipeline.run(job).await?;
    let artifact = state.storage.put(output.resolved.bytes.clone()).await?;

    tracing::info!(
        key = %artifact.filename,
        quality = output.resolved.quality,
        size_bytes = artifact.size_bytes,
        within_budget = output.resolved.within_budget(),
        "Resized image stored"
    );

    Ok(Json(UploadResponse {
        preview_url: state.artifact_url(PREVIEW_PATH, &artifact.filename),
        download_url: state.artifact_url(DOWNLOAD_PATH, &artifact.filename),
        actual_size_kb: output.resolved.size_kb(),
        quality: output.resolved.quality,
        width: output.dimensions.width,
        height: output.dimensions.height,
        filename: artifact.filename,
    }))
}
