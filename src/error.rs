//! Error types shared across the application

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, validating or writing the settings file.
///
/// Any of these means the whole file is rejected; settings are never
/// partially applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised by the external condition queries (idle, microphone, windows).
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Failed to execute {command}: {source}")]
    Spawn {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {stderr}")]
    Failed { command: &'static str, stderr: String },

    #[error("Unexpected output from {command}: {output:?}")]
    Unparseable { command: &'static str, output: String },
}

/// Errors raised while reading or writing the autostart desktop entry.
#[derive(Debug, Error)]
pub enum AutostartError {
    #[error("Installed desktop file not found: {0}")]
    NotInstalled(PathBuf),

    #[error("Failed to access desktop file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Desktop file has no usable {key} entry")]
    MissingKey { key: &'static str },
}
