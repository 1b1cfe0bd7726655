//! JPEG codec
//!
//! The expensive decode + resize happens once in `JpegCodec::prepare`; the
//! resulting `PreparedImage` can then be encoded at as many qualities as the
//! resolver wants to try.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageReader, RgbImage};
use resizer_core::PixelDimensions;
use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Something that can produce encoded bytes at a requested quality.
///
/// The Quality Resolver only depends on this, never on the concrete codec.
pub trait FrameEncoder {
    fn encode(&self, quality: u8) -> Result<Bytes, CodecError>;
}

/// Decodes uploads and resizes them to fill the target box exactly.
#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    filter: FilterType,
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl JpegCodec {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Decode `source` and resize it to `dimensions`.
    ///
    /// The image is scaled to cover the target box and centre-cropped, so the
    /// result is always exactly `width x height`.
    pub fn prepare(
        &self,
        source: &[u8],
        dimensions: PixelDimensions,
    ) -> Result<PreparedImage, CodecError> {
        let img = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        let (src_width, src_height) = img.dimensions();
        tracing::debug!(
            src_width,
            src_height,
            target_width = dimensions.width,
            target_height = dimensions.height,
            "Resizing image"
        );

        let resized = img.resize_to_fill(dimensions.width, dimensions.height, self.filter);

        Ok(PreparedImage {
            rgb: resized.into_rgb8(),
        })
    }
}

/// A decoded, resized frame ready to be encoded.
pub struct PreparedImage {
    rgb: RgbImage,
}

impl PreparedImage {
    pub fn dimensions(&self) -> PixelDimensions {
        PixelDimensions {
            width: self.rgb.width(),
            height: self.rgb.height(),
        }
    }
}

impl FrameEncoder for PreparedImage {
    fn encode(&self, quality: u8) -> Result<Bytes, CodecError> {
        let (width, height) = self.rgb.dimensions();
        let mut buffer = Vec::with_capacity((width * height / 4) as usize);

        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        encoder
            .encode_image(&self.rgb)
            .map_err(|e| CodecError::Encode(e.to_string()))?;

        Ok(Bytes::from(buffer))
    }
}
