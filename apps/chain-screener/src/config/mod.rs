//! Configuration module for the chain screener.
//!
//! Loads the run configuration (shape selection, constraints, ranking and
//! logging) from a JSON or YAML document with environment variable
//! interpolation. The screening core only ever sees the parsed, validated
//! structs; it never reads files or the environment itself.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chain_screener::config::load_config;
//!
//! // Load from default path (config.json)
//! let config = load_config(None)?;
//!
//! // Load YAML from a custom path
//! let config = load_config(Some("screens/short_premium.yaml"))?;
//!
//! println!("ranking by {}", config.ranking.key);
//! ```

mod constraints;
mod observability;
mod ranking;
mod shapes;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use constraints::{Bounds, ConstraintSet};
pub use observability::LoggingConfig;
pub use ranking::RankingConfig;
pub use shapes::ShapeSelector;

/// Default configuration path.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    YamlError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Document format of a configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl ConfigFormat {
    /// Infer the format from a file extension; anything but `.yaml`/`.yml`
    /// is treated as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Strategy families to generate.
    #[serde(default)]
    pub strategy_filter: ShapeSelector,
    /// Option- and strategy-level constraints.
    #[serde(default)]
    pub config_filter: ConstraintSet,
    /// Ranking key and result count.
    #[serde(default)]
    pub ranking: RankingConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.json".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<ScreenConfig, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    let config = load_config_from_str(&contents, ConfigFormat::from_path(Path::new(path)))?;

    tracing::debug!(path, "Loaded screening config");
    Ok(config)
}

/// Load configuration from a string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the document cannot be parsed or validated.
pub fn load_config_from_str(
    contents: &str,
    format: ConfigFormat,
) -> Result<ScreenConfig, ConfigError> {
    let interpolated = interpolate_env_vars(contents);

    let config: ScreenConfig = match format {
        ConfigFormat::Json => serde_json::from_str(&interpolated)?,
        ConfigFormat::Yaml => serde_yaml_bw::from_str(&interpolated)?,
    };

    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &ScreenConfig) -> Result<(), ConfigError> {
    config.config_filter.validate()?;

    let valid_formats = ["pretty", "json"];
    if !valid_formats
        .iter()
        .any(|f| config.logging.format.eq_ignore_ascii_case(f))
    {
        return Err(ConfigError::ValidationError(format!(
            "logging.format must be one of: {valid_formats:?}"
        )));
    }

    if !config.strategy_filter.any() {
        tracing::warn!("No strategy families selected; screening will produce no candidates");
    }

    Ok(())
}
