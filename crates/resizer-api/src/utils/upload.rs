//! Multipart parsing shared by the upload and estimate handlers

use crate::constants::fields;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use resizer_core::units::parse_dimension;
use resizer_core::{AppError, QualitySpec, Unit, UnitConverter};
use resizer_processing::{ResizeJob, UploadValidator};
use std::ops::RangeInclusive;

use crate::error::HttpAppError;

/// The image part of the form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Raw fields of a resize form, before validation
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub image: Option<UploadedFile>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub unit: Option<String>,
    pub size_option: Option<String>,
    pub quality: Option<String>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", e.body_text()))
    }
}

/// Read every field of the form. Only one field named "image" is accepted;
/// unknown fields are ignored.
pub async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == fields::IMAGE {
            if form.image.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple image fields are not allowed; send exactly one field named 'image'"
                        .to_string(),
                ));
            }
            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field.content_type().map(|s| s.to_string());
            let data = field.bytes().await.map_err(multipart_error)?;

            form.image = Some(UploadedFile {
                data,
                file_name,
                content_type,
            });
            continue;
        }

        let slot = match field_name.as_str() {
            fields::WIDTH => &mut form.width,
            fields::HEIGHT => &mut form.height,
            fields::UNIT => &mut form.unit,
            fields::SIZE_OPTION => &mut form.size_option,
            fields::QUALITY => &mut form.quality,
            _ => {
                tracing::debug!(field = %field_name, "Ignoring unknown form field");
                continue;
            }
        };
        *slot = Some(field.text().await.map_err(multipart_error)?);
    }

    Ok(form)
}

impl UploadForm {
    /// Validate the form and resolve it into a resize job.
    ///
    /// Checks run in a fixed order: image presence and upload limits, then
    /// dimensions, unit and pixel conversion, and finally the quality request.
    pub fn into_job(
        self,
        converter: &UnitConverter,
        validator: &UploadValidator,
        allowed_kb: &RangeInclusive<u32>,
    ) -> Result<ResizeJob, HttpAppError> {
        let image = self
            .image
            .ok_or_else(|| AppError::MissingFile("No image uploaded".to_string()))?;
        validator.validate(image.data.len(), image.content_type.as_deref())?;

        let width = parse_dimension(fields::WIDTH, required(self.width.as_deref(), fields::WIDTH)?)?;
        let height =
            parse_dimension(fields::HEIGHT, required(self.height.as_deref(), fields::HEIGHT)?)?;

        let unit: Unit = self
            .unit
            .as_deref()
            .ok_or_else(|| AppError::InvalidUnit("unit is required".to_string()))?
            .parse()?;

        let dimensions = converter.convert(width, height, unit)?;

        let quality = QualitySpec::from_fields(
            self.size_option.as_deref(),
            self.quality.as_deref(),
            allowed_kb,
        )?;

        tracing::debug!(
            file_name = image.file_name.as_deref().unwrap_or("unknown"),
            size_bytes = image.data.len(),
            width,
            height,
            unit = %unit,
            pixel_width = dimensions.width,
            pixel_height = dimensions.height,
            "Parsed resize request"
        );

        Ok(ResizeJob {
            source: image.data,
            dimensions,
            quality,
        })
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value.ok_or_else(|| AppError::InvalidDimension(format!("{} is required", field)))
}
