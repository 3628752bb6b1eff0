//! Configuration and CLI argument handling

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use directories::BaseDirs;

pub const APP_DIR: &str = "eyecare_reminder";
pub const DESKTOP_FILE_NAME: &str = "eyecare_reminder.desktop";

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "eyecare-reminder")]
#[command(about = "Reminds you to look away from the screen at configurable intervals")]
#[command(version)]
pub struct Config {
    /// Port of the local control API
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address of the local control API
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Path of the YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Append logs to the log file instead of writing them to stdout
    #[arg(long)]
    pub log_to_file: bool,

    /// Sound played with the reminder (.wav)
    #[arg(long)]
    pub reminder_sound: Option<PathBuf>,

    /// Sound played when the cooldown ends (.wav)
    #[arg(long)]
    pub cooldown_sound: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve every file location the application uses
    pub fn paths(&self) -> anyhow::Result<AppPaths> {
        let dirs = BaseDirs::new().context("Could not determine the user's home directory")?;
        let mut paths = AppPaths::under(dirs.config_dir(), dirs.data_dir());

        if let Some(config) = &self.config {
            paths.config_file = config.clone();
        }
        if let Some(sound) = &self.reminder_sound {
            paths.reminder_sound = sound.clone();
        }
        if let Some(sound) = &self.cooldown_sound {
            paths.cooldown_sound = sound.clone();
        }
        Ok(paths)
    }
}

/// File locations, resolved once at startup
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_file: PathBuf,
    pub log_file: PathBuf,
    pub desktop_file: PathBuf,
    /// Absolute icon path written into the desktop file
    pub desktop_icon: PathBuf,
    pub icon: PathBuf,
    pub icon_attention: PathBuf,
    pub reminder_sound: PathBuf,
    pub cooldown_sound: PathBuf,
}

impl AppPaths {
    /// Lay out the default locations under the given XDG config and data homes
    pub fn under(config_home: impl AsRef<Path>, data_home: impl AsRef<Path>) -> Self {
        let config_dir = config_home.as_ref().join(APP_DIR);
        let data_home = data_home.as_ref();
        let data_dir = data_home.join(APP_DIR);

        Self {
            config_file: config_dir.join("config.yaml"),
            log_file: config_dir.join("log.log"),
            desktop_file: data_home.join("applications").join(DESKTOP_FILE_NAME),
            desktop_icon: data_home.join("icons").join(APP_DIR).join("icon.png"),
            icon: data_dir.join("icon.png"),
            icon_attention: data_dir.join("icon_attention.png"),
            reminder_sound: data_dir.join("sounds").join("relax-message-tone.wav"),
            cooldown_sound: data_dir.join("sounds").join("piece-of-cake-611.wav"),
        }
    }
}
