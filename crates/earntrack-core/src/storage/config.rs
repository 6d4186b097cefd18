//! TOML-based application configuration.
//!
//! Holds tuning knobs that are not part of the user's salary settings:
//! - Tick cadence of the live display
//! - Celebration effect shape
//! - Input disambiguation thresholds
//! - Display precision and notice durations
//! - Base URL used for share links
//!
//! Configuration is stored at `<data dir>/config.toml`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::input::SwipeThresholds;
use crate::session::Fireworks;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelebrationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_celebration_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_burst_interval_ms")]
    pub burst_interval_ms: u64,
    #[serde(default = "default_max_particles")]
    pub max_particles: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_double_tap_window_ms")]
    pub double_tap_window_ms: u64,
    #[serde(default = "default_swipe_min_offset")]
    pub swipe_min_offset: f64,
    #[serde(default = "default_swipe_min_velocity")]
    pub swipe_min_velocity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_earnings_decimals")]
    pub earnings_decimals: usize,
    #[serde(default = "default_reset_notice_ms")]
    pub reset_notice_ms: u64,
    #[serde(default = "default_copied_notice_ms")]
    pub copied_notice_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Page location used when none is given.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub celebration: CelebrationConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub link: LinkConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    50
}
fn default_true() -> bool {
    true
}
fn default_celebration_duration_ms() -> u64 {
    3000
}
fn default_burst_interval_ms() -> u64 {
    250
}
fn default_max_particles() -> u32 {
    50
}
fn default_double_tap_window_ms() -> u64 {
    250
}
fn default_swipe_min_offset() -> f64 {
    100.0
}
fn default_swipe_min_velocity() -> f64 {
    500.0
}
fn default_earnings_decimals() -> usize {
    8
}
fn default_reset_notice_ms() -> u64 {
    1500
}
fn default_copied_notice_ms() -> u64 {
    2000
}
fn default_base_url() -> String {
    "https://earntrack.app/".into()
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: default_celebration_duration_ms(),
            burst_interval_ms: default_burst_interval_ms(),
            max_particles: default_max_particles(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_tap_window_ms: default_double_tap_window_ms(),
            swipe_min_offset: default_swipe_min_offset(),
            swipe_min_velocity: default_swipe_min_velocity(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            earnings_decimals: default_earnings_decimals(),
            reset_notice_ms: default_reset_notice_ms(),
            copied_notice_ms: default_copied_notice_ms(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl TickerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl CelebrationConfig {
    pub fn fireworks(&self) -> Fireworks {
        Fireworks {
            duration: Duration::from_millis(self.duration_ms),
            burst_interval: Duration::from_millis(self.burst_interval_ms.max(1)),
            max_particles: self.max_particles,
        }
    }
}

impl InputConfig {
    pub fn swipe(&self) -> SwipeThresholds {
        SwipeThresholds {
            min_offset: self.swipe_min_offset,
            min_velocity: self.swipe_min_velocity,
        }
    }
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("config.toml"),
                message: e.to_string(),
            })
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
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

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.update(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}
