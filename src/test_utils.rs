//! Shared test doubles for the scheduler's collaborators.

#![cfg(test)]

use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use crate::{
    error::{ConfigError, QueryError},
    services::{ConditionChecker, Notifier},
    settings::{Settings, SettingsProvider},
};

#[derive(Debug, Default)]
struct ConditionFlags {
    idle: AtomicBool,
    mic: AtomicBool,
    window: AtomicBool,
    failing: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
}

/// Condition checker with switchable answers that records which checks ran
#[derive(Debug, Clone, Default)]
pub struct FakeConditions {
    flags: Arc<ConditionFlags>,
}

impl FakeConditions {
    pub fn set_idle(&self, value: bool) {
        self.flags.idle.store(value, Ordering::SeqCst);
    }

    pub fn set_mic(&self, value: bool) {
        self.flags.mic.store(value, Ordering::SeqCst);
    }

    pub fn set_window(&self, value: bool) {
        self.flags.window.store(value, Ordering::SeqCst);
    }

    pub fn set_failing(&self, value: bool) {
        self.flags.failing.store(value, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.flags.calls.lock().unwrap().clone()
    }

    fn answer(&self, check: &'static str, flag: &AtomicBool) -> Result<bool, QueryError> {
        self.flags.calls.lock().unwrap().push(check);
        if self.flags.failing.load(Ordering::SeqCst) {
            return Err(QueryError::Failed {
                command: check,
                stderr: "no display".to_string(),
            });
        }
        Ok(flag.load(Ordering::SeqCst))
    }
}

impl ConditionChecker for FakeConditions {
    async fn is_idle(&self, _threshold: Duration) -> Result<bool, QueryError> {
        self.answer("idle", &self.flags.idle)
    }

    async fn is_microphone_active(&self) -> Result<bool, QueryError> {
        self.answer("microphone", &self.flags.mic)
    }

    async fn is_blacklisted_window_open(&self, _names: &BTreeSet<String>) -> Result<bool, QueryError> {
        self.answer("window", &self.flags.window)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    Reminder { cooldown_secs: u64, sound: bool },
    CooldownEnded { sound: bool },
    ConfigReloaded,
    BadConfig,
    Tooltip(String),
    AnimationStarted,
    AnimationStopped,
    AnimationFrame,
}

/// Notifier that records every command it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<NotifierEvent>>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<NotifierEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Only the reminder and all-clear messages
    pub fn notifications(&self) -> Vec<NotifierEvent> {
        self.events()
            .into_iter()
            .filter(|e| {
                matches!(
                    e,
                    NotifierEvent::Reminder { .. } | NotifierEvent::CooldownEnded { .. }
                )
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn push(&self, event: NotifierEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Notifier for RecordingNotifier {
    fn show_reminder(&self, cooldown_secs: u64, play_sound: bool) {
        self.push(NotifierEvent::Reminder {
            cooldown_secs,
            sound: play_sound,
        });
    }

    fn show_cooldown_ended(&self, play_sound: bool) {
        self.push(NotifierEvent::CooldownEnded { sound: play_sound });
    }

    fn show_config_reloaded(&self) {
        self.push(NotifierEvent::ConfigReloaded);
    }

    fn show_bad_config(&self, _error: &ConfigError) {
        self.push(NotifierEvent::BadConfig);
    }

    fn set_tooltip(&self, next_time: &str) {
        self.push(NotifierEvent::Tooltip(next_time.to_string()));
    }

    fn start_animation(&self) {
        self.push(NotifierEvent::AnimationStarted);
    }

    fn stop_animation(&self) {
        self.push(NotifierEvent::AnimationStopped);
    }

    fn animate_icon(&self) -> bool {
        self.push(NotifierEvent::AnimationFrame);
        true
    }
}

/// Settings provider serving a fixed YAML document from memory
#[derive(Debug, Clone)]
pub struct FakeProvider {
    yaml: Arc<Mutex<String>>,
}

impl FakeProvider {
    /// Serve the given settings without running them through validation
    pub fn valid(settings: Settings) -> Self {
        Self::yaml(&settings.to_yaml().unwrap())
    }

    pub fn yaml(data: &str) -> Self {
        Self {
            yaml: Arc::new(Mutex::new(data.to_string())),
        }
    }

    pub fn set_yaml(&self, data: &str) {
        *self.yaml.lock().unwrap() = data.to_string();
    }
}

impl SettingsProvider for FakeProvider {
    fn load(&self) -> Result<Settings, ConfigError> {
        let data = self.yaml.lock().unwrap().clone();
        serde_yaml::from_str(&data).map_err(ConfigError::Parse)
    }

    fn write_defaults(&self) -> Result<Settings, ConfigError> {
        let settings = Settings::default();
        self.set_yaml(&settings.to_yaml()?);
        Ok(settings)
    }
}
