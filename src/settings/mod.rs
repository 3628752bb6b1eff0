//! User settings module
//!
//! This module contains the reminder settings and the provider that persists
//! them as a YAML file.

pub mod provider;
pub mod settings;

// Re-export main types
pub use provider::{SettingsProvider, YamlSettingsProvider};
pub use settings::Settings;
