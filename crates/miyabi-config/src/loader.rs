//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, LogFormat, MiyabiConfig};

/// Prefix used by [`ConfigLoader::with_env`].
pub const DEFAULT_ENV_PREFIX: &str = "MIYABI";

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (or a preset)
/// 2. Configuration file or string (TOML or JSON)
/// 3. Environment variables
///
/// # Example
///
/// ```no_run
/// use miyabi_config::ConfigLoader;
///
/// # fn main() -> Result<(), miyabi_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_production()
///     .with_optional_file("miyabi.toml")?
///     .with_dotenv()?
///     .with_env()
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: MiyabiConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MiyabiConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with development preset configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use miyabi_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = MiyabiConfig::development();
        self
    }

    /// Start with production preset configuration.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = MiyabiConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`. Keys the file
    /// sets override the current layer; keys it omits keep their current
    /// values, so a preset chosen earlier survives a partial file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed,
    /// has an unsupported extension, or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some(format @ ("toml" | "json")) => self.merge_config(&content, format)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration file format: {}",
                    path.display()
                )))
            }
        }

        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Same as [`with_file`](Self::with_file) when the file exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `format` (`"toml"` or `"json"`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unsupported.
    ///
    /// # Example
    ///
    /// ```
    /// use miyabi_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [docs]
    ///     title = "User Service"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.docs.title, "User Service");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.merge_config(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Apply `MIYABI__SECTION__KEY` environment overrides on load.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Apply `PREFIX__SECTION__KEY` environment overrides on load.
    ///
    /// For example, with prefix `MIYABI`:
    /// - `MIYABI__VALIDATION__ENFORCE_RESPONSES=false`
    /// - `MIYABI__DOCS__SCHEMES=http,https`
    /// - `MIYABI__TELEMETRY__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load variables from a `.env` file in the current directory, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvError` if the file exists but cannot be
    /// parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Load variables from the given `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvError` if the file is missing or malformed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path)?;
        Ok(self)
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies environment overrides (if a prefix was set) and validates the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or validation
    /// fails.
    pub fn load(mut self) -> Result<MiyabiConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_vars(env::vars(), &prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> MiyabiConfig {
        self.config
    }

    /// Overlay the keys present in `content` onto the current layer.
    fn merge_config(&mut self, content: &str, format: &str) -> Result<(), ConfigError> {
        // Full parse first so unknown keys fail with the format's own error.
        parse(content, format)?;

        let layer: serde_json::Value = match format {
            "toml" => toml::from_str(content)?,
            _ => serde_json::from_str(content)?,
        };
        let mut merged = serde_json::to_value(&self.config)?;
        overlay(&mut merged, layer);
        self.config = serde_json::from_value(merged)?;

        Ok(())
    }

    fn apply_env_vars(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
        prefix: &str,
    ) -> Result<(), ConfigError> {
        let section_prefix = format!("{prefix}__");
        for (key, value) in vars {
            if key.starts_with(&section_prefix) {
                self.apply_env_var(&key, &value, prefix)?;
            }
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();
        let flag = || {
            parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
        };

        let validation = &mut self.config.validation;
        let docs = &mut self.config.docs;
        let telemetry = &mut self.config.telemetry;

        match parts.as_slice() {
            ["VALIDATION", "VALIDATE_REQUESTS"] => validation.validate_requests = flag()?,
            ["VALIDATION", "VALIDATE_RESPONSES"] => validation.validate_responses = flag()?,
            ["VALIDATION", "ENFORCE_RESPONSES"] => validation.enforce_responses = flag()?,
            ["VALIDATION", "REJECT_MISSING_FIELDS"] => validation.reject_missing_fields = flag()?,
            ["VALIDATION", "ALLOW_UNDECLARED_STATUS"] => {
                validation.allow_undeclared_status = flag()?;
            }

            ["DOCS", "HOST"] => docs.host = value.to_string(),
            ["DOCS", "TITLE"] => docs.title = value.to_string(),
            ["DOCS", "VERSION"] => docs.version = value.to_string(),
            ["DOCS", "SCHEMES"] => {
                docs.schemes = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_lowercase)
                    .collect();
            }
            ["DOCS", "BASE_PATH"] => docs.base_path = value.to_string(),
            ["DOCS", "OUTPUT_PATH"] => docs.output_path = value.to_string(),

            ["TELEMETRY", "SERVICE_NAME"] => telemetry.service_name = value.to_string(),
            ["TELEMETRY", "LOGGING", "ENABLED"] => telemetry.logging.enabled = flag()?,
            ["TELEMETRY", "LOGGING", "LEVEL"] => telemetry.logging.level = value.to_string(),
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                telemetry.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["TELEMETRY", "METRICS", "ENABLED"] => telemetry.metrics.enabled = flag()?,

            // Unknown keys under the prefix are ignored
            _ => {}
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<MiyabiConfig, ConfigError> {
    match format {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        _ => Err(ConfigError::validation_error(format!(
            "unsupported configuration format: {format}"
        ))),
    }
}

/// Recursively merge `layer` into `base`. Tables merge key by key; any other
/// value replaces what was there.
fn overlay(base: &mut serde_json::Value, layer: serde_json::Value) {
    match (base, layer) {
        (serde_json::Value::Object(base), serde_json::Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
