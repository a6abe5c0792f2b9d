//! Configuration management for Aether
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AetherError;
use crate::units::TemperatureUnit;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for Aether
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AetherConfig {
    /// Provider endpoints and credentials
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default search settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Synthetic data settings
    #[serde(default)]
    pub mock: MockConfig,
}

/// Provider endpoints and request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Access key for the current-conditions provider. Without one the
    /// pipeline runs in simulation mode.
    pub access_key: Option<String>,
    /// Base URL of the current-conditions provider
    #[serde(default = "default_current_url")]
    pub current_url: String,
    /// Base URL of the CORS relay proxy
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    /// Base URL of the historical archive provider
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    /// Base URL of the air-quality provider
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    /// Per-request timeout in seconds; an elapsed timeout is a transport failure
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// City searched when none is given
    #[serde(default = "default_city")]
    pub city: String,
    /// Display unit, "C" or "F"
    #[serde(default = "default_unit")]
    pub unit: String,
    /// One-tap city shortcuts offered to the user
    #[serde(default = "default_quick_cities")]
    pub quick_cities: Vec<String>,
}

/// Synthetic data settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MockConfig {
    /// Fixed seed for synthetic records; random when absent
    pub seed: Option<u64>,
}

// Default value functions
fn default_current_url() -> String {
    "http://api.weatherstack.com".to_string()
}

fn default_relay_url() -> String {
    "https://api.allorigins.win".to_string()
}

fn default_archive_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_city() -> String {
    "London".to_string()
}

fn default_unit() -> String {
    "C".to_string()
}

fn default_quick_cities() -> Vec<String> {
    ["Tokyo", "London", "New York", "Dubai", "Sydney", "Paris"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            current_url: default_current_url(),
            relay_url: default_relay_url(),
            archive_url: default_archive_url(),
            air_quality_url: default_air_quality_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            unit: default_unit(),
            quick_cities: default_quick_cities(),
        }
    }
}

impl ProvidersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl AetherConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // AETHER__PROVIDERS__ACCESS_KEY, AETHER__LOGGING__LEVEL, ...
        builder = builder.add_source(
            Environment::with_prefix("AETHER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AetherConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aether").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.providers.current_url.is_empty() {
            self.providers.current_url = default_current_url();
        }
        if self.providers.relay_url.is_empty() {
            self.providers.relay_url = default_relay_url();
        }
        if self.providers.archive_url.is_empty() {
            self.providers.archive_url = default_archive_url();
        }
        if self.providers.air_quality_url.is_empty() {
            self.providers.air_quality_url = default_air_quality_url();
        }
        if self.providers.timeout_seconds == 0 {
            self.providers.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.city.trim().is_empty() {
            self.defaults.city = default_city();
        }
        if self.defaults.unit.is_empty() {
            self.defaults.unit = default_unit();
        }
        if self
            .providers
            .access_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.providers.access_key = None;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_access_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the provider access key when one is present
    pub fn validate_access_key(&self) -> Result<()> {
        if let Some(key) = &self.providers.access_key {
            if key.len() < 8 {
                return Err(AetherError::config(
                    "Access key appears to be invalid (too short). Please check your access key.",
                )
                .into());
            }

            if key.len() > 100 {
                return Err(AetherError::config(
                    "Access key appears to be invalid (too long). Please check your access key.",
                )
                .into());
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.timeout_seconds > 120 {
            return Err(
                AetherError::config("Provider timeout cannot exceed 120 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AetherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AetherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("current", &self.providers.current_url),
            ("relay", &self.providers.relay_url),
            ("archive", &self.providers.archive_url),
            ("air quality", &self.providers.air_quality_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AetherError::config(format!(
                    "The {name} provider URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.defaults.unit.parse::<TemperatureUnit>().is_err() {
            return Err(AetherError::config(format!(
                "Invalid display unit '{}'. Must be C or F",
                self.defaults.unit
            ))
            .into());
        }

        Ok(())
    }

    /// Configured display unit; validation guarantees it parses
    pub fn display_unit(&self) -> TemperatureUnit {
        self.defaults.unit.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AetherConfig::default();
        assert_eq!(config.providers.current_url, "http://api.weatherstack.com");
        assert_eq!(config.providers.relay_url, "https://api.allorigins.win");
        assert_eq!(config.providers.timeout_seconds, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.city, "London");
        assert_eq!(config.defaults.quick_cities.len(), 6);
        assert!(config.providers.access_key.is_none());
        assert!(config.mock.seed.is_none());
    }

    #[test]
    fn test_missing_access_key_is_valid() {
        let config = AetherConfig::default();
        assert!(config.validate_access_key().is_ok());
    }

    #[test]
    fn test_short_access_key_rejected() {
        let mut config = AetherConfig::default();
        config.providers.access_key = Some("abc".to_string());
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_blank_access_key_becomes_simulation_mode() {
        let mut config = AetherConfig::default();
        config.providers.access_key = Some("   ".to_string());
        config.apply_defaults();
        assert!(config.providers.access_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AetherConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_timeout_range() {
        let mut config = AetherConfig::default();
        config.providers.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_invalid_provider_url() {
        let mut config = AetherConfig::default();
        config.providers.archive_url = "ftp://archive.example".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("archive provider URL"));
    }

    #[test]
    fn test_invalid_unit() {
        let mut config = AetherConfig::default();
        config.defaults.unit = "K".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = AetherConfig::default();
        config.providers.timeout_seconds = 0;
        config.logging.format = String::new();
        config.defaults.city = " ".to_string();
        config.apply_defaults();
        assert_eq!(config.providers.timeout_seconds, 10);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.defaults.city, "London");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[providers]
access_key = "0123456789abcdef"
timeout_seconds = 4

[defaults]
city = "Paris"
unit = "F"

[mock]
seed = 42
"#,
        )
        .unwrap();

        let config = AetherConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.providers.access_key.as_deref(), Some("0123456789abcdef"));
        assert_eq!(config.providers.timeout(), Duration::from_secs(4));
        assert_eq!(config.providers.archive_url, "https://archive-api.open-meteo.com/v1");
        assert_eq!(config.defaults.city, "Paris");
        assert_eq!(config.display_unit(), TemperatureUnit::Fahrenheit);
        assert_eq!(config.mock.seed, Some(42));
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AetherConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("aether"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
