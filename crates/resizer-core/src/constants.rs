//! Fixed values shared by the converter, resolver, and store.

/// Pixels per centimeter at 96 DPI.
pub const PX_PER_CM: f64 = 37.7953;
/// Pixels per inch (CSS reference pixel).
pub const PX_PER_INCH: f64 = 96.0;
pub const PX_PER_PX: f64 = 1.0;

/// Largest edge (in pixels) the service agrees to produce.
pub const MAX_PIXEL_DIMENSION: u32 = 20_000;
/// Default cap on output area (width * height), about 40 megapixels.
pub const DEFAULT_MAX_OUTPUT_PIXELS: u64 = 40_000_000;

/// Size-budget search: highest candidate quality.
pub const SEARCH_MAX_QUALITY: u8 = 90;
/// Size-budget search: lowest candidate quality.
pub const SEARCH_MIN_QUALITY: u8 = 10;
/// Size-budget search: decrement between candidates.
pub const SEARCH_STEP: u8 = 5;

/// Linear estimate: quality per requested kilobyte.
pub const LINEAR_QUALITY_PER_KB: u32 = 2;

pub const DEFAULT_PRESET_LOW: u8 = 40;
pub const DEFAULT_PRESET_MEDIUM: u8 = 70;
pub const DEFAULT_PRESET_HIGH: u8 = 90;

/// Presets must stay inside the encoder's useful range.
pub const PRESET_MIN_QUALITY: u8 = 1;
pub const PRESET_MAX_QUALITY: u8 = 99;

/// Artifact filename prefix and extension: `output-<id>.jpg`.
pub const ARTIFACT_PREFIX: &str = "output-";
pub const ARTIFACT_EXTENSION: &str = "jpg";

/// Name suggested to browsers on `/download`.
pub const DOWNLOAD_FILENAME: &str = "resized-image.jpg";
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";
