//! Resize pipeline
//!
//! Decode + resize once, then let the Quality Resolver encode as many times as
//! it needs. The whole thing is CPU bound and runs on the blocking pool.

use bytes::Bytes;
use resizer_core::{PixelDimensions, QualitySpec, ResizeSettings};
use std::time::Instant;

use crate::codec::{CodecError, JpegCodec};
use crate::quality::{QualityResolver, ResolvedQuality};

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Processing task failed: {0}")]
    TaskFailed(String),
}

/// One resize request with everything already validated and converted.
#[derive(Debug, Clone)]
pub struct ResizeJob {
    pub source: Bytes,
    pub dimensions: PixelDimensions,
    pub quality: QualitySpec,
}

#[derive(Debug, Clone)]
pub struct ResizeOutput {
    pub dimensions: PixelDimensions,
    pub resolved: ResolvedQuality,
}

#[derive(Debug, Clone, Copy)]
pub struct ResizePipeline {
    codec: JpegCodec,
    resolver: QualityResolver,
}

impl ResizePipeline {
    pub fn new(settings: &ResizeSettings) -> Self {
        Self {
            codec: JpegCodec::default(),
            resolver: QualityResolver::new(settings),
        }
    }

    pub fn resolver(&self) -> &QualityResolver {
        &self.resolver
    }

    /// Run the job on the current thread.
    pub fn run_blocking(&self, job: &ResizeJob) -> Result<ResizeOutput, ProcessingError> {
        let start = Instant::now();

        let prepared = self.codec.prepare(&job.source, job.dimensions)?;
        let resolved = self.resolver.resolve(job.quality, &prepared)?;

        tracing::info!(
            width = job.dimensions.width,
            height = job.dimensions.height,
            quality = resolved.quality,
            source_bytes = job.source.len(),
            output_bytes = resolved.bytes.len(),
            within_budget = resolved.within_budget(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image resized"
        );

        Ok(ResizeOutput {
            dimensions: prepared.dimensions(),
            resolved,
        })
    }

    /// Run the job on the blocking thread pool.
    pub async fn run(&self, job: ResizeJob) -> Result<ResizeOutput, ProcessingError> {
        let pipeline = *self;
        tokio::task::spawn_blocking(move || pipeline.run_blocking(&job))
            .await
            .map_err(|e| ProcessingError::TaskFailed(e.to_string()))?
    }
}
