//! Run configuration.
//!
//! Configuration is layered: stock defaults are overridden by an optional
//! TOML file (`--config`), which is in turn overridden by command-line flags.
//! Each layer is a sparse TOML table merged key-by-key onto the one below.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input_dir = "imagenes"            # Directory scanned for <digits>.<extension>
//! output_dir = "imagenes/enhanced"  # Created with parents if missing
//! amount = 0.45                     # Sharpen amount a (any finite number)
//! min_bytes = 150000                # Smaller files are copied unchanged
//! extension = "png"                 # Input extension, without the dot
//!
//! [processing]
//! max_processes = 1                 # Parallel workers (0 = one per CPU core)
//! keep_going = false                # Skip failing files instead of aborting
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{InvalidAmount, SharpenAmount};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Config validation error: {0}")]
    Amount(#[from] InvalidAmount),
}

/// Batch configuration.
///
/// All fields have defaults. Config files need only specify the values they
/// want to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhanceConfig {
    /// Directory scanned for input images.
    pub input_dir: PathBuf,
    /// Directory receiving sharpened and copied files.
    pub output_dir: PathBuf,
    /// Sharpen amount `a`.
    pub amount: f64,
    /// Files strictly smaller than this many bytes bypass sharpening.
    pub min_bytes: u64,
    /// Input file extension, without the leading dot.
    pub extension: String,
    /// Worker and failure-policy settings.
    pub processing: ProcessingConfig,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("imagenes"),
            output_dir: PathBuf::from("imagenes/enhanced"),
            amount: SharpenAmount::default().value(),
            min_bytes: 150_000,
            extension: "png".to_string(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl EnhanceConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        SharpenAmount::new(self.amount)?;
        if self.extension.is_empty() || !self.extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ConfigError::Validation(format!(
                "extension must be non-empty ASCII letters/digits without a dot, got {:?}",
                self.extension
            )));
        }
        if self.input_dir == self.output_dir {
            return Err(ConfigError::Validation(format!(
                "output_dir must differ from input_dir ({})",
                self.input_dir.display()
            )));
        }
        Ok(())
    }
}

/// Parallel processing and failure-policy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers. `1` processes files one at a
    /// time in numeric order; `0` uses one worker per CPU core.
    /// Values larger than the core count are clamped down.
    pub max_processes: usize,
    /// Log and skip files that fail to decode or encode instead of aborting.
    pub keep_going: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_processes: 1,
            keep_going: false,
        }
    }
}

/// Resolve the effective thread count from config.
///
/// - `0` → use all available cores
/// - `n` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match config.max_processes {
        0 => cores,
        n => n.min(cores),
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub processing: ProcessingOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_going: Option<bool>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(EnhanceConfig::default())?)
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

/// Read a config file as a raw TOML value. The file must exist.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Merge overlays in order onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<EnhanceConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: EnhanceConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Build the effective config: defaults ← `file` (if any) ← `overrides`.
pub fn load_config(
    file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<EnhanceConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let mut layers = Vec::new();
    if let Some(path) = file {
        layers.push(load_raw_config(path)?);
    }
    layers.push(toml::Value::try_from(overrides)?);
    resolve_config(base, layers)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sharpen-batch configuration
# ==========================
#
# Every key is optional; values shown are the defaults.
# Command-line flags override values from this file.

# Directory scanned for input images. Only files named
# <digits>.<extension> directly inside it are processed.
input_dir = "imagenes"

# Where results are written. Created (with parents) if missing.
# Must differ from input_dir.
output_dir = "imagenes/enhanced"

# Sharpen amount a. The 3x3 kernel uses 1 + 4a at the centre and -a on
# the four orthogonal neighbours. 0 leaves images unchanged.
amount = 0.45

# Files smaller than this many bytes are copied byte-for-byte
# instead of being sharpened.
min_bytes = 150000

# Input file extension, without the dot. Matched case-insensitively.
extension = "png"

[processing]
# Parallel workers. 1 = one file at a time in numeric order,
# 0 = one worker per CPU core.
max_processes = 1

# false: the first failing file aborts the run.
# true:  failing files are reported and skipped; the run still
#        exits with an error once everything else is done.
keep_going = false
"##
}
