//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Breathing cycle phase durations
//! - Breathing runner poll interval and inter-phase gap
//! - Whether sound cues start enabled on a fresh profile
//!
//! Configuration is stored at `~/.config/mindease/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::breathing::{BreathingCycle, Phase, PhaseName, RunnerTiming};
use crate::error::{ConfigError, ValidationError};

/// Breathing cycle and timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_inhale")]
    pub inhale_secs: u64,
    #[serde(default = "default_hold")]
    pub hold_secs: u64,
    #[serde(default = "default_exhale")]
    pub exhale_secs: u64,
    /// Interval between progress polls while a phase runs.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Pause between the end of one phase and the start of the next.
    #[serde(default = "default_phase_gap_ms")]
    pub phase_gap_ms: u64,
}

/// Sound configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Used only when no sound flag has been persisted yet.
    #[serde(default = "default_true")]
    pub default_enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/mindease/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub sound: SoundConfig,
}

fn default_inhale() -> u64 {
    4
}
fn default_hold() -> u64 {
    4
}
fn default_exhale() -> u64 {
    6
}
fn default_poll_interval_ms() -> u64 {
    250
}
fn default_phase_gap_ms() -> u64 {
    300
}
fn default_true() -> bool {
    true
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            inhale_secs: default_inhale(),
            hold_secs: default_hold(),
            exhale_secs: default_exhale(),
            poll_interval_ms: default_poll_interval_ms(),
            phase_gap_ms: default_phase_gap_ms(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            default_enabled: true,
        }
    }
}

impl BreathingConfig {
    /// Build the breathing cycle described by this configuration.
    ///
    /// # Errors
    /// Returns an error if any phase is configured with zero seconds.
    pub fn cycle(&self) -> Result<BreathingCycle, ValidationError> {
        BreathingCycle::new(vec![
            Phase::new(PhaseName::Inhale, self.inhale_secs),
            Phase::new(PhaseName::Hold, self.hold_secs),
            Phase::new(PhaseName::Exhale, self.exhale_secs),
        ])
    }

    /// Poll interval and phase gap for the runner.
    ///
    /// # Errors
    /// Returns an error if the poll interval is zero.
    pub fn timing(&self) -> Result<RunnerTiming, ValidationError> {
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::ZeroPollInterval);
        }
        Ok(RunnerTiming {
            poll_interval_ms: self.poll_interval_ms,
            phase_gap_ms: self.phase_gap_ms,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.cycle()?;
        self.timing()?;
        Ok(())
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

        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot overwrite a whole section".into()));
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
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// A breathing section that describes an unusable timer is replaced by
    /// the defaults in memory; the file itself is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                Ok(cfg.sanitized())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Replace an invalid breathing section with the defaults.
    pub fn sanitized(mut self) -> Self {
        if let Err(e) = self.breathing.validate() {
            tracing::warn!("ignoring breathing config: {e}");
            self.breathing = BreathingConfig::default();
        }
        self
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
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

    /// Set a config value by key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// the result would describe an invalid breathing timer, or the config
    /// cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let updated = self.with_value(key, value)?;
        updated.save()?;
        *self = updated;
        Ok(())
    }

    fn with_value(&self, key: &str, value: &str) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated
            .breathing
            .validate()
            .map_err(|e| invalid(e.to_string()))?;
        Ok(updated)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("falling back to default config: {e}");
            Self::default()
        })
    }
}
