//! Configuration module
//!
//! Configuration is read once from the environment (and an optional `.env`
//! file) at startup. The conversion factors and quality tables derived from it
//! are handed to the converter and resolver as an immutable `ResizeSettings`.

use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_OUTPUT_PIXELS, DEFAULT_PRESET_HIGH, DEFAULT_PRESET_LOW, DEFAULT_PRESET_MEDIUM,
};
use crate::quality::{PresetTable, SearchBounds, SizeStrategy};
use crate::units::ConversionFactors;

const SERVER_PORT: u16 = 5000;
const MAX_FILE_SIZE_MB: usize = 10;
const HTTP_CONCURRENCY_LIMIT: usize = 256;
const RETENTION_SECS: u64 = 3600;
const SWEEP_INTERVAL_SECS: u64 = 900;
const MIN_TARGET_KB: u32 = 5;
const MAX_TARGET_KB: u32 = 5000;
const OUTPUT_DIR: &str = "public/outputs";
const ALLOWED_CONTENT_TYPES: &str =
    "image/jpeg,image/png,image/gif,image/webp,image/bmp,image/tiff";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Prefix for the absolute URLs returned to clients, without trailing slash.
    pub public_base_url: String,
    pub log_format: String,
}

/// Immutable conversion and quality tables injected into the converter and resolver.
#[derive(Clone, Debug)]
pub struct ResizeSettings {
    pub factors: ConversionFactors,
    pub presets: PresetTable,
    pub size_strategy: SizeStrategy,
    pub search_bounds: SearchBounds,
    pub min_target_kb: u32,
    pub max_target_kb: u32,
    /// Largest output area (width * height) a request may ask for.
    pub max_output_pixels: u64,
}

impl ResizeSettings {
    pub fn target_kb_range(&self) -> RangeInclusive<u32> {
        self.min_target_kb..=self.max_target_kb
    }
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            factors: ConversionFactors::default(),
            presets: PresetTable::default(),
            size_strategy: SizeStrategy::default(),
            search_bounds: SearchBounds::default(),
            min_target_kb: MIN_TARGET_KB,
            max_target_kb: MAX_TARGET_KB,
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub output_dir: PathBuf,
    pub max_file_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub retention: Duration,
    pub sweep_interval: Duration,
    pub estimate_enabled: bool,
    /// Maximum requests served at once; uploads are CPU heavy.
    pub http_concurrency_limit: usize,
    pub resize: ResizeSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                public_base_url: format!("http://localhost:{}", SERVER_PORT),
                log_format: "pretty".to_string(),
            },
            output_dir: PathBuf::from(OUTPUT_DIR),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_content_types: split_list(ALLOWED_CONTENT_TYPES),
            retention: Duration::from_secs(RETENTION_SECS),
            sweep_interval: Duration::from_secs(SWEEP_INTERVAL_SECS),
            estimate_enabled: true,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            resize: ResizeSettings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        let base = BaseConfig {
            server_port,
            cors_origins: split_list(&cors_origins_str),
            environment,
            public_base_url,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase(),
        };

        let size_strategy = match env::var("SIZE_STRATEGY") {
            Ok(raw) => raw.parse::<SizeStrategy>()?,
            Err(_) => SizeStrategy::default(),
        };

        let resize = ResizeSettings {
            factors: ConversionFactors::default(),
            presets: PresetTable::new(
                env_or("PRESET_LOW", DEFAULT_PRESET_LOW),
                env_or("PRESET_MEDIUM", DEFAULT_PRESET_MEDIUM),
                env_or("PRESET_HIGH", DEFAULT_PRESET_HIGH),
            ),
            size_strategy,
            search_bounds: SearchBounds::default(),
            min_target_kb: env_or("MIN_TARGET_KB", MIN_TARGET_KB),
            max_target_kb: env_or("MAX_TARGET_KB", MAX_TARGET_KB),
            max_output_pixels: env_or("MAX_OUTPUT_PIXELS", DEFAULT_MAX_OUTPUT_PIXELS),
        };

        let config = Config {
            base,
            output_dir: PathBuf::from(
                env::var("OUTPUT_DIR").unwrap_or_else(|_| OUTPUT_DIR.to_string()),
            ),
            max_file_size_bytes: env_or("MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB) * 1024 * 1024,
            allowed_content_types: split_list(
                &env::var("ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|_| ALLOWED_CONTENT_TYPES.to_string()),
            ),
            retention: Duration::from_secs(env_or("RETENTION_SECS", RETENTION_SECS)),
            sweep_interval: Duration::from_secs(env_or("SWEEP_INTERVAL_SECS", SWEEP_INTERVAL_SECS)),
            estimate_enabled: env_or("ESTIMATE_ENABLED", true),
            http_concurrency_limit: env_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT).max(1),
            resize,
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on settings that cannot work together.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.resize.min_target_kb == 0 || self.resize.min_target_kb > self.resize.max_target_kb {
            return Err(anyhow::anyhow!(
                "MIN_TARGET_KB ({}) must be at least 1 and not exceed MAX_TARGET_KB ({})",
                self.resize.min_target_kb,
                self.resize.max_target_kb
            ));
        }
        if self.resize.max_output_pixels == 0 {
            return Err(anyhow::anyhow!("MAX_OUTPUT_PIXELS must be greater than 0"));
        }
        if self.sweep_interval.is_zero() {
            return Err(anyhow::anyhow!("SWEEP_INTERVAL_SECS must be greater than 0"));
        }
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES must not be empty"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn public_base_url(&self) -> &str {
        &self.base.public_base_url
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.base.log_format
    }
}

/// Whether an environment name (`ENVIRONMENT` / `APP_ENV`) means production.
pub fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
