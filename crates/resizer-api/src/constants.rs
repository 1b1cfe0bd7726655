//! Route paths

pub const UPLOAD_PATH: &str = "/upload";
pub const ESTIMATE_PATH: &str = "/estimate";
pub const PREVIEW_PATH: &str = "/preview";
pub const DOWNLOAD_PATH: &str = "/download";
pub const HEALTH_PATH: &str = "/health";

/// Multipart field names accepted by `/upload` and `/estimate`
pub mod fields {
    pub const IMAGE: &str = "image";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const UNIT: &str = "unit";
    pub const SIZE_OPTION: &str = "sizeOption";
    pub const QUALITY: &str = "quality";
}
