//! TOML-based configuration.
//!
//! Stores carousel tuning:
//! - Segment timing (default duration, rewind grace window)
//! - Sync behavior (indicator push on timer path, index validation)
//! - Screen behavior (tap zones, finish policy, tick interval)
//!
//! Configuration is stored at `~/.config/storyreel/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Returns `~/.config/storyreel[-dev]/` based on STORYREEL_ENV.
///
/// Set STORYREEL_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STORYREEL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("storyreel-dev")
    } else {
        base_dir.join("storyreel")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// How the controller treats an index a surface should never have reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexPolicy {
    /// Reject with `SyncError`.
    Strict,
    /// Clamp into range and log a warning.
    Clamp,
}

impl Default for IndexPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            IndexPolicy::Strict
        } else {
            IndexPolicy::Clamp
        }
    }
}

/// What the screen does once the last segment completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishPolicy {
    /// Stay on the last item with a full progress bar.
    #[default]
    Hold,
    /// Tear the screen down.
    Dismiss,
    /// Jump every surface back to the first item and play again.
    Restart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_segment_duration_ms")]
    pub segment_duration_ms: u64,
    /// Rewinding within this many ms of a segment start goes to the previous segment.
    #[serde(default = "default_rewind_grace_ms")]
    pub rewind_grace_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_true")]
    pub push_indicator_on_timer: bool,
    #[serde(default)]
    pub index_policy: IndexPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Width share of each edge tap zone (leading rewinds, trailing skips).
    #[serde(default = "default_tap_zone_fraction")]
    pub tap_zone_fraction: f64,
    #[serde(default)]
    pub on_finish: FinishPolicy,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/storyreel/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
}

fn default_segment_duration_ms() -> u64 {
    5_000
}
fn default_rewind_grace_ms() -> u64 {
    1_000
}
fn default_true() -> bool {
    true
}
fn default_tap_zone_fraction() -> f64 {
    0.3
}
fn default_tick_interval_ms() -> u64 {
    50
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            segment_duration_ms: default_segment_duration_ms(),
            rewind_grace_ms: default_rewind_grace_ms(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            push_indicator_on_timer: true,
            index_policy: IndexPolicy::default(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            tap_zone_fraction: default_tap_zone_fraction(),
            on_finish: FinishPolicy::default(),
            tick_interval_ms: default_tick_interval_ms(),
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let parent = match parent_path {
            Some(path) => {
                let mut current = &mut *root;
                for part in path.split('.') {
                    current = current
                        .get_mut(part)
                        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                }
                current
            }
            None => root,
        };
        let obj = parent
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(leaf)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

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
            serde_json::Value::Object(_) => {
                return Err(ConfigError::UnknownKey(key.to_string()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("falling back to default config: {e}");
                Self::default()
            }
        }
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
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.segment_duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.segment_duration_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        if !(0.0..=0.5).contains(&self.screen.tap_zone_fraction) {
            return Err(ConfigError::InvalidValue {
                key: "screen.tap_zone_fraction".into(),
                message: "must be between 0.0 and 0.5".into(),
            });
        }
        if self.screen.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "screen.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
