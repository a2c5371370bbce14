//! Batch configuration module.
//!
//! Handles loading, validating, and merging `batchpix.toml`. Stock defaults
//! are overridden by the user's config file, and command-line flags override
//! both.
//!
//! ## Config File Location
//!
//! `batchpix` looks for `batchpix.toml` in the working directory, or reads the
//! file named by `--config`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! quality = 0.9             # JPEG quality in (0, 1]
//! max_dimension = 2048      # Longest edge in pixels
//! enhance = false           # Run color correction + texture + sharpen
//! prefix = "processed_"     # Output file name prefix
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//!
//! [limits]
//! max_file_size = 52428800  # Bytes; larger inputs are rejected
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::formats::DEFAULT_MAX_FILE_SIZE;
use crate::imaging::{ProcessingParameters, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "batchpix.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Batch configuration loaded from `batchpix.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Encoding and pipeline settings.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Input screening limits.
    pub limits: LimitsConfig,
}

impl BatchConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Quality::new(self.output.quality).map_err(|_| {
            ConfigError::Validation("output.quality must be in (0, 1]".into())
        })?;
        if self.output.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "output.max_dimension must be positive".into(),
            ));
        }
        if self.limits.max_file_size == 0 {
            return Err(ConfigError::Validation(
                "limits.max_file_size must be positive".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Pipeline parameters described by the `[output]` section.
    pub fn parameters(&self) -> Result<ProcessingParameters, ConfigError> {
        ProcessingParameters::new(
            self.output.quality,
            self.output.max_dimension,
            self.output.enhance,
        )
        .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality in (0, 1].
    pub quality: f32,
    /// Upper bound on the longest edge, in pixels.
    pub max_dimension: u32,
    /// Apply color correction, texture and sharpen passes.
    pub enhance: bool,
    /// Prefix prepended to the output file stem.
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let params = ProcessingParameters::default();
        Self {
            quality: params.quality.value(),
            max_dimension: params.max_dimension,
            enhance: params.enhance,
            prefix: "processed_".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Input screening limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Inputs larger than this many bytes are rejected before decoding.
    pub max_file_size: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BatchConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. A missing file yields `None`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay over `base`, deserialize, and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BatchConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BatchConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `batchpix.toml` from `dir`, falling back to stock defaults.
pub fn load_config(dir: &Path) -> Result<BatchConfig, ConfigError> {
    let overlay = load_raw_config(&dir.join(CONFIG_FILE_NAME))?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Load an explicitly named config file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<BatchConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// A documented `batchpix.toml` with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r##"# batchpix Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality, greater than 0 and at most 1.
quality = 0.9

# Longest edge in pixels. Larger images are scaled down, aspect preserved.
# Smaller images are never scaled up.
max_dimension = 2048

# Run the enhancement passes: automatic brightness/contrast/saturation
# correction, then a texture filter, then a sharpen filter.
enhance = false

# Output files are named <prefix><stem>.jpg.
prefix = "processed_"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Limits
# ---------------------------------------------------------------------------
[limits]
# Inputs larger than this many bytes are rejected (default 50 MiB).
max_file_size = 52428800
"##
}
