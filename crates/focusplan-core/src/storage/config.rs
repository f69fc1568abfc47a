//! TOML-based application configuration.
//!
//! Stores:
//! - Default AI settings (tone, intervention level, daily reflection)
//! - Analysis defaults (UTC offset, trailing range length)
//!
//! Configuration is stored at `~/.config/focusplan/config.toml`.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::data_dir;
use crate::error::{ConfigError, CoreError, ValidationError};
use crate::model::{offset_from_minutes, AiSettings};

/// Defaults for range construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minutes east of UTC used for every local-time computation.
    #[serde(default)]
    pub timezone_offset_minutes: i32,
    /// Length of the trailing window when no explicit dates are given.
    #[serde(default = "default_range_days")]
    pub default_range_days: u32,
}

/// Upper bound accepted for `analysis.default_range_days`.
pub const MAX_RANGE_DAYS: u32 = 3660;

fn default_range_days() -> u32 {
    7
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timezone_offset_minutes: 0,
            default_range_days: default_range_days(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            value
                                .parse::<f64>()
                                .ok()
                                .and_then(serde_json::Number::from_f64)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("only scalar values can be set".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Path of the config file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, returning defaults on any problem.
    pub fn load() -> Self {
        match Self::path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                warn!("config directory unavailable, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Load from a specific file, returning defaults if it is missing or
    /// cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(cfg) => {
                    debug!(path = %path.display(), "loaded config");
                    cfg
                }
                Err(e) => {
                    warn!(path = %path.display(), "invalid config, using defaults: {e}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to a specific file.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;

        // Lenient enums decode unknown strings to a default; reject those here.
        if let Some(stored) = updated.get(key) {
            if !stored.eq_ignore_ascii_case(value.trim()) && value.parse::<f64>().is_err() {
                return Err(invalid(format!("unsupported value '{value}'")));
            }
        }

        updated.offset().map_err(|e| invalid(e.to_string()))?;
        if !(1..=MAX_RANGE_DAYS).contains(&updated.analysis.default_range_days) {
            return Err(invalid(format!("expected 1..={MAX_RANGE_DAYS} days")));
        }
        *self = updated;
        Ok(())
    }

    /// The configured UTC offset.
    ///
    /// # Errors
    /// Returns an error if the stored offset is out of range.
    pub fn offset(&self) -> Result<FixedOffset, ValidationError> {
        offset_from_minutes(self.analysis.timezone_offset_minutes)
    }
}
