//! Reminder settings structure and validation

use std::{collections::BTreeSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_REMINDER_INTERVAL: u64 = 1200;
pub const DEFAULT_COOLDOWN_INTERVAL: u64 = 120;
pub const DEFAULT_IDLE_THRESHOLD: u64 = 300;
/// Upper bound for every interval, one year in seconds
pub const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// Reminder settings as persisted in the YAML config file.
///
/// Every key is mandatory. Intervals are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub reminder_interval: u64,
    #[serde(rename = "reminder_cooldown_interval")]
    pub cooldown_interval: u64,
    #[serde(rename = "idle_time")]
    pub idle_threshold: u64,
    #[serde(rename = "suppress_when_microphone_active")]
    pub suppress_on_mic: bool,
    #[serde(rename = "enable_sound")]
    pub sound_enabled: bool,
    /// Not consulted by the suppression chain, kept for config compatibility
    #[serde(rename = "blacklist_process_names")]
    pub blacklisted_processes: BTreeSet<String>,
    #[serde(rename = "blacklist_window_names")]
    pub blacklisted_windows: BTreeSet<String>,
}

impl Settings {
    /// Parse and validate settings from a YAML document
    pub fn from_yaml(data: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(data).map_err(ConfigError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to a YAML document
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::Serialize)
    }

    /// Check the semantic constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("reminder_interval", self.reminder_interval),
            ("reminder_cooldown_interval", self.cooldown_interval),
            ("idle_time", self.idle_threshold),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
            if value > MAX_INTERVAL_SECS {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be at most {} seconds", MAX_INTERVAL_SECS),
                });
            }
        }
        Ok(())
    }

    pub fn reminder_duration(&self) -> Duration {
        Duration::from_secs(self.reminder_interval)
    }

    pub fn cooldown_duration(&self) -> Duration {
        Duration::from_secs(self.cooldown_interval)
    }

    pub fn idle_duration(&self) -> Duration {
        Duration::from_secs(self.idle_threshold)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reminder_interval: DEFAULT_REMINDER_INTERVAL,
            cooldown_interval: DEFAULT_COOLDOWN_INTERVAL,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            suppress_on_mic: true,
            sound_enabled: true,
            blacklisted_processes: BTreeSet::new(),
            blacklisted_windows: BTreeSet::new(),
        }
    }
}
