//! User-facing notifications, sounds and tray presentation

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};
use notify_rust::{Notification, Timeout};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::{
    config::AppPaths,
    error::ConfigError,
    state::{TrayIcon, TrayState},
};

pub const APP_NAME: &str = "Eyecare Reminder";
pub const REMINDER_MESSAGE: &str = "Look in the distance for {} seconds.";
pub const REMINDER_END_MESSAGE: &str = "You can go back to whatever you were doing now.";
pub const CONFIG_RELOADED_MESSAGE: &str = "Config successfully reloaded";
pub const BAD_CONFIG_MESSAGE: &str =
    "The config file is broken. Fix it and reload, or reset it to defaults.";
pub const NEXT_REMINDER_MESSAGE: &str = "Next reminder at: {}";

/// Commands the scheduler issues towards the user
pub trait Notifier {
    fn show_reminder(&self, cooldown_secs: u64, play_sound: bool);
    fn show_cooldown_ended(&self, play_sound: bool);
    fn show_config_reloaded(&self);
    fn show_bad_config(&self, error: &ConfigError);
    fn set_tooltip(&self, next_time: &str);
    fn start_animation(&self);
    /// Stop the pulse and put the default icon back
    fn stop_animation(&self);
    /// Advance the icon animation by one frame
    fn animate_icon(&self) -> bool;
}

/// Display settings for notifications
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub reminder_timeout: Duration,
    pub cooldown_timeout: Duration,
    pub info_timeout: Duration,
    pub animation_period: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            reminder_timeout: Duration::from_millis(10_000),
            cooldown_timeout: Duration::from_millis(10_000),
            info_timeout: Duration::from_millis(3_000),
            animation_period: Duration::from_millis(500),
        }
    }
}

/// Format the reminder body for the given cooldown
pub fn reminder_message(cooldown_secs: u64) -> String {
    REMINDER_MESSAGE.replace("{}", &cooldown_secs.to_string())
}

/// Format the tooltip for the given next reminder time
pub fn next_reminder_message(next_time: &str) -> String {
    NEXT_REMINDER_MESSAGE.replace("{}", next_time)
}

fn notification_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

/// Notifier using freedesktop notifications and `aplay`
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    config: NotifierConfig,
    icon: PathBuf,
    icon_attention: PathBuf,
    reminder_sound: PathBuf,
    cooldown_sound: PathBuf,
    tray: Arc<Mutex<TrayState>>,
}

impl DesktopNotifier {
    pub fn new(config: NotifierConfig, paths: &AppPaths, tray: Arc<Mutex<TrayState>>) -> Self {
        Self {
            config,
            icon: paths.icon.clone(),
            icon_attention: paths.icon_attention.clone(),
            reminder_sound: paths.reminder_sound.clone(),
            cooldown_sound: paths.cooldown_sound.clone(),
            tray,
        }
    }

    fn notify(&self, body: String, icon: &Path, timeout: Duration) {
        let icon = icon.display().to_string();
        let timeout = Timeout::Milliseconds(notification_millis(timeout));

        // notification delivery goes over D-Bus and may block
        tokio::task::spawn_blocking(move || {
            let result = Notification::new()
                .appname(APP_NAME)
                .summary(APP_NAME)
                .body(&body)
                .icon(&icon)
                .timeout(timeout)
                .show();
            match result {
                Ok(_) => debug!("Notification shown: {}", body),
                Err(e) => error!("Failed to show notification: {}", e),
            }
        });
    }

    fn with_tray<F>(&self, updater: F) -> bool
    where
        F: FnOnce(&mut TrayState),
    {
        match self.tray.lock() {
            Ok(mut tray) => {
                updater(&mut *tray);
                true
            }
            Err(e) => {
                error!("Failed to lock tray state: {}", e);
                false
            }
        }
    }
}

impl Notifier for DesktopNotifier {
    fn show_reminder(&self, cooldown_secs: u64, play_sound: bool) {
        info!("Showing reminder for {}s", cooldown_secs);
        self.notify(
            reminder_message(cooldown_secs),
            &self.icon_attention,
            self.config.reminder_timeout,
        );
        if play_sound {
            if let Err(e) = play_sound_file(&self.reminder_sound) {
                error!("{}", e);
            }
        }
    }

    fn show_cooldown_ended(&self, play_sound: bool) {
        info!("Showing cooldown ended message");
        self.notify(
            REMINDER_END_MESSAGE.to_string(),
            &self.icon,
            self.config.cooldown_timeout,
        );
        if play_sound {
            if let Err(e) = play_sound_file(&self.cooldown_sound) {
                error!("{}", e);
            }
        }
    }

    fn show_config_reloaded(&self) {
        self.notify(
            CONFIG_RELOADED_MESSAGE.to_string(),
            &self.icon,
            self.config.info_timeout,
        );
    }

    fn show_bad_config(&self, error: &ConfigError) {
        warn!("Bad config: {}", error);
        self.notify(
            format!("{}\n\n{}", BAD_CONFIG_MESSAGE, error),
            &self.icon_attention,
            self.config.reminder_timeout,
        );
    }

    fn set_tooltip(&self, next_time: &str) {
        let tooltip = next_reminder_message(next_time);
        debug!("{}", tooltip);
        self.with_tray(|tray| tray.tooltip = tooltip);
    }

    fn start_animation(&self) {
        self.with_tray(|tray| tray.animating = true);
    }

    fn stop_animation(&self) {
        self.with_tray(|tray| {
            tray.animating = false;
            tray.icon = TrayIcon::Default;
        });
    }

    fn animate_icon(&self) -> bool {
        self.with_tray(TrayState::toggle_icon)
    }
}

/// Play a `.wav` file with `aplay` without waiting for it to finish
pub fn play_sound_file(path: &Path) -> Result<(), String> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if ext != "wav" {
        return Err(format!("Unsupported audio extension .{} for {}", ext, path.display()));
    }
    if !path.exists() {
        return Err(format!("Sound file not found: {}", path.display()));
    }

    Command::new("aplay")
        .arg("-q")
        .arg(path)
        .spawn()
        .map_err(|e| format!("Failed to execute aplay: {}", e))?;

    debug!("Playing {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> (DesktopNotifier, Arc<Mutex<TrayState>>) {
        let tray = Arc::new(Mutex::new(TrayState::new()));
        let paths = AppPaths::under("/tmp/eyecare-test-config", "/tmp/eyecare-test-data");
        let notifier = DesktopNotifier::new(NotifierConfig::default(), &paths, Arc::clone(&tray));
        (notifier, tray)
    }

    #[test]
    fn test_messages() {
        assert_eq!(reminder_message(20), "Look in the distance for 20 seconds.");
        assert_eq!(next_reminder_message("14:05"), "Next reminder at: 14:05");
    }

    #[test]
    fn test_tooltip_and_animation_update_tray() {
        let (notifier, tray) = notifier();

        notifier.set_tooltip("09:30");
        notifier.start_animation();
        assert!(notifier.animate_icon());
        {
            let tray = tray.lock().unwrap();
            assert_eq!(tray.tooltip, "Next reminder at: 09:30");
            assert!(tray.animating);
            assert_eq!(tray.icon, TrayIcon::Attention);
        }

        assert!(notifier.animate_icon());
        assert_eq!(tray.lock().unwrap().icon, TrayIcon::Default);
        notifier.animate_icon();
        notifier.stop_animation();
        let tray = tray.lock().unwrap();
        assert!(!tray.animating);
        assert_eq!(tray.icon, TrayIcon::Default);
    }

    #[test]
    fn test_notification_timeout_saturates() {
        assert_eq!(notification_millis(Duration::from_secs(10)), 10_000);
        assert_eq!(notification_millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }

    #[test]
    fn test_play_sound_rejects_non_wav() {
        let err = play_sound_file(Path::new("/tmp/tone.mp3")).unwrap_err();
        assert!(err.contains("Unsupported audio extension .mp3"));
    }

    #[test]
    fn test_play_sound_missing_file() {
        let err = play_sound_file(Path::new("/nonexistent/tone.wav")).unwrap_err();
        assert!(err.contains("not found"));
    }
}
