//! Physical unit to pixel conversion
//!
//! Unknown unit tags are rejected with `AppError::InvalidUnit`; there is no
//! silent fallback to centimeters. Pixel counts are `value * factor` rounded
//! half away from zero (`f64::round`). Each edge is capped at
//! `MAX_PIXEL_DIMENSION` and the total area at the converter's pixel budget.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{
    DEFAULT_MAX_OUTPUT_PIXELS, MAX_PIXEL_DIMENSION, PX_PER_CM, PX_PER_INCH, PX_PER_PX,
};
use crate::error::AppError;

/// Unit a caller expresses width/height in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Centimeter,
    Inch,
    Pixel,
}

impl FromStr for Unit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cm" => Ok(Unit::Centimeter),
            "inch" => Ok(Unit::Inch),
            "px" => Ok(Unit::Pixel),
            other => Err(AppError::InvalidUnit(format!(
                "Unsupported unit '{}'. Must be one of: cm, inch, px",
                other
            ))),
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Unit::Centimeter => write!(f, "cm"),
            Unit::Inch => write!(f, "inch"),
            Unit::Pixel => write!(f, "px"),
        }
    }
}

/// Pixels per unit for each supported unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionFactors {
    pub centimeter: f64,
    pub inch: f64,
    pub pixel: f64,
}

impl Default for ConversionFactors {
    fn default() -> Self {
        Self {
            centimeter: PX_PER_CM,
            inch: PX_PER_INCH,
            pixel: PX_PER_PX,
        }
    }
}

impl ConversionFactors {
    pub fn factor(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Centimeter => self.centimeter,
            Unit::Inch => self.inch,
            Unit::Pixel => self.pixel,
        }
    }
}

/// Target size in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelDimensions {
    pub width: u32,
    pub height: u32,
}

impl PixelDimensions {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UnitConverter {
    factors: ConversionFactors,
    max_pixels: u64,
}

impl UnitConverter {
    pub fn new(factors: ConversionFactors) -> Self {
        Self {
            factors,
            max_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
        }
    }

    /// Cap the output area (width * height) this converter accepts.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels.max(1);
        self
    }

    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }

    /// Convert a width/height pair expressed in `unit` into pixels.
    pub fn convert(&self, width: f64, height: f64, unit: Unit) -> Result<PixelDimensions, AppError> {
        let dimensions = PixelDimensions {
            width: self.to_pixels("width", width, unit)?,
            height: self.to_pixels("height", height, unit)?,
        };

        if dimensions.area() > self.max_pixels {
            return Err(AppError::InvalidDimension(format!(
                "{}x{} pixels exceeds the maximum output area of {} pixels",
                dimensions.width, dimensions.height, self.max_pixels
            )));
        }

        Ok(dimensions)
    }

    fn to_pixels(&self, field: &str, value: f64, unit: Unit) -> Result<u32, AppError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AppError::InvalidDimension(format!(
                "{} must be a positive number, got {}",
                field, value
            )));
        }

        let pixels = (value * self.factors.factor(unit)).round();

        if pixels < 1.0 {
            return Err(AppError::InvalidDimension(format!(
                "{} of {}{} is smaller than one pixel",
                field, value, unit
            )));
        }
        if pixels > MAX_PIXEL_DIMENSION as f64 {
            return Err(AppError::InvalidDimension(format!(
                "{} of {}{} exceeds the maximum of {} pixels",
                field, value, unit, MAX_PIXEL_DIMENSION
            )));
        }

        Ok(pixels as u32)
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(ConversionFactors::default())
    }
}

/// Parse a numeric form field (`width`/`height`) into a float.
pub fn parse_dimension(field: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim().parse::<f64>().map_err(|_| {
        AppError::InvalidDimension(format!("{} must be numeric, got '{}'", field, raw))
    })
}
