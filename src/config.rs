//! Configuration management for Greenplug
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files with support for environment variable overrides.

use crate::error::{GreenplugError, Result};
use crate::policy::GatingPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation-data provider configuration
    pub provider: ProviderConfig,

    /// Sequematic webhook configuration
    pub sequematic: SequematicConfig,

    /// Decision policy configuration
    pub policy: PolicyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Generation-data provider endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// URL of the published electricity-generation time series
    pub url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Sequematic smart-switch webhook endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequematicConfig {
    /// Base URL of the Sequematic service
    pub base_url: String,

    /// URL suffix identifying the switch variable
    /// (e.g. "9999/ABCDF0123/variable_name")
    pub switch_url_suffix: String,

    /// Optional URL suffix of a variable receiving the green percentage
    pub value_url_suffix: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Decision policy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Green-energy percentage at or above which the switch should be on
    pub green_energy_threshold: u8,

    /// Gating rule (threshold-only or threshold-and-surplus)
    pub gating: GatingPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (DEBUG, INFO, WARNING, ERROR, CRITICAL)
    pub level: String,

    /// Path to log file (empty disables file output)
    pub file: String,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: "https://www.northwesternenergy.com/get-electricity-generation".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for SequematicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sequematic.com".to_string(),
            switch_url_suffix: String::new(),
            value_url_suffix: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            green_energy_threshold: 80,
            gating: GatingPolicy::Threshold,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: String::new(),
            console_output: true,
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from default locations and apply environment overrides
    pub fn load() -> Result<Self> {
        let default_paths = [
            "greenplug_config.yaml",
            "/etc/greenplug/config.yaml",
        ];

        let mut config = None;
        if let Ok(path) = std::env::var("GREENPLUG_CONFIG") {
            config = Some(Self::from_file(path)?);
        } else {
            for path in &default_paths {
                if Path::new(path).exists() {
                    config = Some(Self::from_file(path)?);
                    break;
                }
            }
        }

        let mut config = config.unwrap_or_default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Apply environment-variable overrides from the given lookup function
    ///
    /// The variable names match the original deployment surface:
    /// `GREEN_ENERGY_THRESHOLD`, `SEQUEMATIC_SWITCH_URL_SUFFIX` and
    /// `SEQUEMATIC_VALUE_URL_SUFFIX`.
    pub fn apply_env_overrides<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = get("GREEN_ENERGY_THRESHOLD") {
            let threshold: u8 = raw.trim().parse().map_err(|_| {
                GreenplugError::config(
                    "GREEN_ENERGY_THRESHOLD must be an integer between 0 and 100. Default: 80",
                )
            })?;
            if threshold > 100 {
                return Err(GreenplugError::config(
                    "GREEN_ENERGY_THRESHOLD must be an integer between 0 and 100. Default: 80",
                ));
            }
            self.policy.green_energy_threshold = threshold;
        }

        if let Some(suffix) = get("SEQUEMATIC_SWITCH_URL_SUFFIX") {
            self.sequematic.switch_url_suffix = suffix;
        }

        if let Some(suffix) = get("SEQUEMATIC_VALUE_URL_SUFFIX") {
            self.sequematic.value_url_suffix = Some(suffix);
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.provider.url.is_empty() {
            return Err(GreenplugError::validation(
                "provider.url",
                "URL cannot be empty",
            ));
        }

        if self.provider.timeout_seconds == 0 {
            return Err(GreenplugError::validation(
                "provider.timeout_seconds",
                "Must be greater than 0",
            ));
        }

        if self.sequematic.base_url.is_empty() {
            return Err(GreenplugError::validation(
                "sequematic.base_url",
                "URL cannot be empty",
            ));
        }

        if self.sequematic.switch_url_suffix.is_empty() {
            return Err(GreenplugError::validation(
                "sequematic.switch_url_suffix",
                "Must be set. Example: 9999/ABCDF0123/variable_name",
            ));
        }

        if let Some(suffix) = &self.sequematic.value_url_suffix {
            if suffix.is_empty() {
                return Err(GreenplugError::validation(
                    "sequematic.value_url_suffix",
                    "Must not be empty when set",
                ));
            }
        }

        if self.policy.green_energy_threshold > 100 {
            return Err(GreenplugError::validation(
                "policy.green_energy_threshold",
                "Must be between 0 and 100",
            ));
        }

        Ok(())
    }
}
