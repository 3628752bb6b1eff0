//! Settings persistence

use std::{
    fs,
    path::PathBuf,
};
use tracing::{debug, info};

use super::Settings;
use crate::error::ConfigError;

/// Source of reminder settings
pub trait SettingsProvider {
    /// Load and validate the settings. The result is all-or-nothing.
    fn load(&self) -> Result<Settings, ConfigError>;

    /// Persist the default settings and return them
    fn write_defaults(&self) -> Result<Settings, ConfigError>;
}

/// Settings stored as a YAML file on disk
#[derive(Debug, Clone)]
pub struct YamlSettingsProvider {
    path: PathBuf,
}

impl YamlSettingsProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsProvider for YamlSettingsProvider {
    fn load(&self) -> Result<Settings, ConfigError> {
        if !self.path.exists() {
            info!("No config found at {}, writing defaults", self.path.display());
            self.write_defaults()?;
        }

        debug!("Loading config from {}", self.path.display());
        let data = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Settings::from_yaml(&data)
    }

    fn write_defaults(&self) -> Result<Settings, ConfigError> {
        let settings = Settings::default();
        let data = settings.to_yaml()?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, data).map_err(|e| self.io_error(e))?;

        info!("Config reset to defaults at {}", self.path.display());
        Ok(settings)
    }
}
