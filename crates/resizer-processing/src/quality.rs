//! Quality Resolver
//!
//! Turns a `QualitySpec` into an encoded buffer and the quality that produced
//! it. Presets are a table lookup; size budgets are either searched for by
//! encoding candidates from high to low quality, or estimated linearly.

use bytes::Bytes;
use resizer_core::constants::LINEAR_QUALITY_PER_KB;
use resizer_core::{PresetTable, QualitySpec, ResizeSettings, SearchBounds, SizeStrategy};

use crate::codec::{CodecError, FrameEncoder};

/// Result of resolving a quality request
#[derive(Debug, Clone)]
pub struct ResolvedQuality {
    pub quality: u8,
    pub bytes: Bytes,
    /// Byte budget the caller asked for, if any.
    pub budget_bytes: Option<u64>,
}

impl ResolvedQuality {
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Rounded kilobytes, as reported to clients.
    pub fn size_kb(&self) -> u64 {
        (self.size_bytes() + 512) / 1024
    }

    /// False only when a budget was requested and could not be met.
    pub fn within_budget(&self) -> bool {
        self.budget_bytes
            .map_or(true, |budget| self.size_bytes() <= budget)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QualityResolver {
    presets: PresetTable,
    strategy: SizeStrategy,
    bounds: SearchBounds,
}

impl QualityResolver {
    pub fn new(settings: &ResizeSettings) -> Self {
        Self {
            presets: settings.presets,
            strategy: settings.size_strategy,
            bounds: settings.search_bounds,
        }
    }

    pub fn strategy(&self) -> SizeStrategy {
        self.strategy
    }

    pub fn preset_quality(&self, preset: resizer_core::QualityPreset) -> u8 {
        self.presets.quality(preset)
    }

    /// Quality the linear strategy picks for a budget: `kb * 2` clamped to the search bounds.
    pub fn linear_quality(&self, kilobytes: u32) -> u8 {
        let min = u32::from(self.bounds.min_quality);
        let max = u32::from(self.bounds.max_quality).max(min);
        kilobytes
            .saturating_mul(LINEAR_QUALITY_PER_KB)
            .clamp(min, max) as u8
    }

    pub fn resolve<E>(&self, spec: QualitySpec, encoder: &E) -> Result<ResolvedQuality, CodecError>
    where
        E: FrameEncoder + ?Sized,
    {
        match spec {
            QualitySpec::Preset(preset) => {
                let quality = self.presets.quality(preset);
                Ok(ResolvedQuality {
                    quality,
                    bytes: encoder.encode(quality)?,
                    budget_bytes: None,
                })
            }
            QualitySpec::TargetSize { kilobytes } => {
                let budget = u64::from(kilobytes) * 1024;
                match self.strategy {
                    SizeStrategy::VerifiedSearch => self.search(budget, encoder),
                    SizeStrategy::LinearEstimate => {
                        let quality = self.linear_quality(kilobytes);
                        Ok(ResolvedQuality {
                            quality,
                            bytes: encoder.encode(quality)?,
                            budget_bytes: Some(budget),
                        })
                    }
                }
            }
        }
    }

    /// Highest candidate quality whose output fits `budget`; otherwise the
    /// smallest output seen during the sweep.
    fn search<E>(&self, budget: u64, encoder: &E) -> Result<ResolvedQuality, CodecError>
    where
        E: FrameEncoder + ?Sized,
    {
        let mut smallest: Option<(u8, Bytes)> = None;
        let mut attempts = 0usize;

        for quality in self.bounds.candidates() {
            let bytes = encoder.encode(quality)?;
            attempts += 1;

            if bytes.len() as u64 <= budget {
                tracing::debug!(
                    quality,
                    size_bytes = bytes.len(),
                    budget_bytes = budget,
                    attempts,
                    "Quality search found fit"
                );
                return Ok(ResolvedQuality {
                    quality,
                    bytes,
                    budget_bytes: Some(budget),
                });
            }

            let is_smaller = smallest
                .as_ref()
                .map_or(true, |(_, best)| bytes.len() < best.len());
            if is_smaller {
                smallest = Some((quality, bytes));
            }
        }

        let (quality, bytes) = smallest.ok_or_else(|| {
            CodecError::Encode("no candidate qualities configured".to_string())
        })?;

        tracing::info!(
            quality,
            size_bytes = bytes.len(),
            budget_bytes = budget,
            attempts,
            "Size budget unreachable, returning smallest candidate"
        );

        Ok(ResolvedQuality {
            quality,
            bytes,
            budget_bytes: Some(budget),
        })
    }
}
