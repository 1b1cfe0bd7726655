//! Quality request types
//!
//! A request asks for quality in exactly one of two ways: a target size in
//! kilobytes (`sizeOption`) or a named preset (`quality`). Which one is active
//! is decided by which field the caller filled in.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_PRESET_HIGH, DEFAULT_PRESET_LOW, DEFAULT_PRESET_MEDIUM, PRESET_MAX_QUALITY,
    PRESET_MIN_QUALITY, SEARCH_MAX_QUALITY, SEARCH_MIN_QUALITY, SEARCH_STEP,
};
use crate::error::AppError;

/// Named quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityPreset {
    Low,
    Medium,
    High,
}

impl FromStr for QualityPreset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(AppError::InvalidQuality(format!(
                "Unknown quality preset '{}'. Must be one of: low, medium, high",
                other
            ))),
        }
    }
}

impl Display for QualityPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            QualityPreset::Low => write!(f, "low"),
            QualityPreset::Medium => write!(f, "medium"),
            QualityPreset::High => write!(f, "high"),
        }
    }
}

/// Encoder quality for each preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetTable {
    low: u8,
    medium: u8,
    high: u8,
}

impl PresetTable {
    /// Values are clamped into the encoder's 1..=99 range.
    pub fn new(low: u8, medium: u8, high: u8) -> Self {
        let clamp = |q: u8| q.clamp(PRESET_MIN_QUALITY, PRESET_MAX_QUALITY);
        Self {
            low: clamp(low),
            medium: clamp(medium),
            high: clamp(high),
        }
    }

    pub fn quality(&self, preset: QualityPreset) -> u8 {
        match preset {
            QualityPreset::Low => self.low,
            QualityPreset::Medium => self.medium,
            QualityPreset::High => self.high,
        }
    }
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::new(DEFAULT_PRESET_LOW, DEFAULT_PRESET_MEDIUM, DEFAULT_PRESET_HIGH)
    }
}

/// How a kilobyte budget is turned into a quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeStrategy {
    /// Encode candidates from high to low quality until one fits.
    #[default]
    VerifiedSearch,
    /// `clamp(kb * 2, 10, 90)` with a single encode and no size guarantee.
    LinearEstimate,
}

impl FromStr for SizeStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "verified_search" | "verified" | "search" => Ok(SizeStrategy::VerifiedSearch),
            "linear_estimate" | "linear" | "estimate" => Ok(SizeStrategy::LinearEstimate),
            _ => Err(anyhow::anyhow!("Invalid size strategy: {}", s)),
        }
    }
}

impl Display for SizeStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SizeStrategy::VerifiedSearch => write!(f, "verified_search"),
            SizeStrategy::LinearEstimate => write!(f, "linear_estimate"),
        }
    }
}

/// Candidate qualities for the size-budget search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBounds {
    pub max_quality: u8,
    pub min_quality: u8,
    pub step: u8,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            max_quality: SEARCH_MAX_QUALITY,
            min_quality: SEARCH_MIN_QUALITY,
            step: SEARCH_STEP,
        }
    }
}

impl SearchBounds {
    /// Candidates in the order they are tried: highest quality first.
    pub fn candidates(&self) -> impl Iterator<Item = u8> {
        let min = self.min_quality;
        let step = self.step.max(1) as usize;
        (min..=self.max_quality.max(min)).rev().step_by(step)
    }
}

/// What the caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualitySpec {
    TargetSize { kilobytes: u32 },
    Preset(QualityPreset),
}

impl QualitySpec {
    /// Build a spec from the raw `sizeOption` / `quality` form fields.
    ///
    /// Exactly one must be present. `sizeOption` must be an integer inside
    /// `allowed_kb`.
    pub fn from_fields(
        size_option: Option<&str>,
        quality: Option<&str>,
        allowed_kb: &RangeInclusive<u32>,
    ) -> Result<Self, AppError> {
        let size_option = size_option.map(str::trim).filter(|s| !s.is_empty());
        let quality = quality.map(str::trim).filter(|s| !s.is_empty());

        match (size_option, quality) {
            (Some(_), Some(_)) => Err(AppError::InvalidQuality(
                "Provide either sizeOption or quality, not both".to_string(),
            )),
            (None, None) => Err(AppError::InvalidQuality(
                "One of sizeOption or quality is required".to_string(),
            )),
            (None, Some(preset)) => Ok(QualitySpec::Preset(preset.parse()?)),
            (Some(raw), None) => {
                let kilobytes = raw.parse::<u32>().map_err(|_| {
                    AppError::InvalidQuality(format!(
                        "sizeOption must be a whole number of kilobytes, got '{}'",
                        raw
                    ))
                })?;
                if !allowed_kb.contains(&kilobytes) {
                    return Err(AppError::InvalidQuality(format!(
                        "sizeOption must be between {} and {} KB, got {}",
                        allowed_kb.start(),
                        allowed_kb.end(),
                        kilobytes
                    )));
                }
                Ok(QualitySpec::TargetSize { kilobytes })
            }
        }
    }
}
