//! TOML Configuration File Support
//!
//! Centralized configuration loading for the assistant, with an optional
//! TOML file at `~/.config/ml-assistant/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! timeout_secs = 120
//!
//! [input]
//! min_rows = 1
//! max_rows = 5
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::DEFAULT_BASE_URL;
use crate::input::InputSizing;

/// Environment variable for the service base URL
pub const ENV_API_URL: &str = "ML_ASSISTANT_API_URL";
/// Environment variable for the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "ML_ASSISTANT_TIMEOUT_SECS";
/// Environment variable for the input height cap in rows
pub const ENV_INPUT_MAX_ROWS: &str = "ML_ASSISTANT_INPUT_MAX_ROWS";

/// Default per-request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the effective configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section of the TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Base URL of the question-answering service
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[input]` section of the TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputToml {
    /// Minimum input height in rows
    pub min_rows: Option<u16>,
    /// Maximum input height in rows
    pub max_rows: Option<u16>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantToml {
    /// Service section
    pub api: ApiToml,
    /// Input affordance section
    pub input: InputToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Connection settings for the question-answering service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL; `/chat` is appended for queries
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Resolved assistant configuration
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    /// Service connection
    pub api: ApiConfig,
    /// Input height bounds
    pub input: InputSizing,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Highest-priority source that contributed a value
    source: ConfigSource,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            input: InputSizing::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl AssistantConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check that the resolved values are usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must start with http:// or https:// (got {url:?})"
            )));
        }
        if self.api.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.input.min_rows == 0 {
            return Err(ConfigError::ValidationError(
                "input.min_rows must be at least 1".to_string(),
            ));
        }
        if self.input.max_rows < self.input.min_rows {
            return Err(ConfigError::ValidationError(format!(
                "input.max_rows ({}) is smaller than input.min_rows ({})",
                self.input.max_rows, self.input.min_rows
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/ml-assistant/config.toml` or
/// `~/.config/ml-assistant/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ml-assistant").join("config.toml"))
}

/// Load configuration from the default file, environment and defaults
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resolved values fail validation. A missing file is not an error.
pub fn load_config() -> Result<AssistantConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// resolved values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<AssistantConfig, ConfigError> {
    let mut config = AssistantConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: AssistantToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut AssistantConfig, toml: &AssistantToml) {
    if let Some(ref url) = toml.api.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(secs) = toml.api.timeout_secs {
        config.api.timeout = Duration::from_secs(secs);
    }
    if let Some(rows) = toml.input.min_rows {
        config.input.min_rows = rows;
    }
    if let Some(rows) = toml.input.max_rows {
        config.input.max_rows = rows;
    }
}

/// Apply environment overrides read through `lookup`
fn apply_env_config<F>(config: &mut AssistantConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL) {
        if !url.trim().is_empty() {
            config.api.base_url = url;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
        match secs.parse::<u64>() {
            Ok(secs) => {
                config.api.timeout = Duration::from_secs(secs);
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(var = ENV_TIMEOUT_SECS, value = %secs, error = %e, "Ignoring unparsable value"),
        }
    }
    if let Some(rows) = lookup(ENV_INPUT_MAX_ROWS) {
        match rows.parse::<u16>() {
            Ok(rows) => {
                config.input.max_rows = rows;
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(var = ENV_INPUT_MAX_ROWS, value = %rows, error = %e, "Ignoring unparsable value"),
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Base URL override
    pub api_url: Option<String>,
    /// Request timeout override (seconds)
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Set request timeout override
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut AssistantConfig) {
        if self.api_url.is_some() || self.timeout_secs.is_some() {
            config.source = ConfigSource::Cli;
        }
        if let Some(ref url) = self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.api.timeout = Duration::from_secs(secs);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
