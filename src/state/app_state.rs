//! Shared application state for the control API

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

use super::{ScheduleSnapshot, TrayState};
use crate::{
    config::AppPaths,
    error::{AutostartError, ConfigError},
    services::Autostart,
    settings::Settings,
    tasks::{CommandReply, SchedulerCommand},
};

/// State shared by the API handlers.
///
/// The scheduler itself lives on its own task; handlers reach it through
/// `commands` and read it through `snapshots`.
pub struct AppState {
    /// Command channel into the reminder timer task
    pub commands: mpsc::Sender<SchedulerCommand>,
    /// Latest published schedule
    pub snapshots: watch::Receiver<ScheduleSnapshot>,
    /// Tooltip and icon state maintained by the notifier
    pub tray: Arc<Mutex<TrayState>>,
    pub autostart: Arc<dyn Autostart + Send + Sync>,
    pub paths: AppPaths,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        commands: mpsc::Sender<SchedulerCommand>,
        snapshots: watch::Receiver<ScheduleSnapshot>,
        tray: Arc<Mutex<TrayState>>,
        autostart: Arc<dyn Autostart + Send + Sync>,
        paths: AppPaths,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            commands,
            snapshots,
            tray,
            autostart,
            paths,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Send a config command to the scheduler and wait for its outcome.
    ///
    /// The outer error means the scheduler task is gone.
    async fn config_command<F>(&self, action: &str, command: F) -> Result<Result<Settings, ConfigError>, String>
    where
        F: FnOnce(Option<CommandReply>) -> SchedulerCommand,
    {
        self.record_action(action);

        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(Some(reply)))
            .await
            .map_err(|e| format!("Failed to reach scheduler: {}", e))?;

        response
            .await
            .map_err(|e| format!("Scheduler dropped the request: {}", e))
    }

    /// Reload the settings file
    pub async fn reload_config(&self) -> Result<Result<Settings, ConfigError>, String> {
        self.config_command("reload", |reply| SchedulerCommand::Reload { reply })
            .await
    }

    /// Overwrite the settings file with defaults and reload
    pub async fn reset_config(&self) -> Result<Result<Settings, ConfigError>, String> {
        self.config_command("reset", |reply| SchedulerCommand::ResetDefaults { reply })
            .await
    }

    /// Flip autostart and return the new value
    pub fn toggle_autostart(&self) -> Result<bool, AutostartError> {
        self.record_action("autostart");
        let enabled = self.autostart.toggle_autostart()?;
        info!("Autostart toggled to {}", enabled);
        Ok(enabled)
    }

    /// Current autostart flag, `None` when the desktop entry is unusable
    pub fn autostart_enabled(&self) -> Option<bool> {
        self.autostart.is_autostart_enabled().ok()
    }

    /// Get the latest schedule snapshot
    pub fn get_snapshot(&self) -> ScheduleSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Get current tray state
    pub fn get_tray_state(&self) -> Result<TrayState, String> {
        self.tray
            .lock()
            .map(|tray| tray.clone())
            .map_err(|e| format!("Failed to lock tray state: {}", e))
    }

    /// Remember the last action requested through the API
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
