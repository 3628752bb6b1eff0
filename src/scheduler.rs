//! Reminder scheduler
//!
//! A two-phase timer state machine. In the `Waiting` phase it counts down to
//! the next reminder; when that timer expires and no suppression condition
//! holds, the reminder is shown and the `Cooldown` phase starts. When the
//! cooldown expires the all-clear is shown (again only if nothing suppresses
//! it) and the cycle goes back to `Waiting`.
//!
//! The scheduler does not own a clock. The caller passes `now` into every
//! transition and sleeps until [`ScheduleState::deadline`].

use chrono::{DateTime, Local};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::{
    error::{ConfigError, QueryError},
    services::{ConditionChecker, Notifier},
    settings::{Settings, SettingsProvider},
    state::{ScheduleSnapshot, ScheduleState, TimerPhase},
};

/// Why a reminder or all-clear was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    Idle,
    Microphone,
    BlacklistedWindow,
}

pub struct Scheduler<C, N> {
    settings: Settings,
    state: ScheduleState,
    checker: C,
    notifier: N,
}

impl<C, N> Scheduler<C, N>
where
    C: ConditionChecker,
    N: Notifier,
{
    /// Create a scheduler and start the waiting timer at `now`
    pub fn new(settings: Settings, checker: C, notifier: N, now: Instant) -> Self {
        let state = ScheduleState::waiting(now, settings.reminder_duration(), String::new());
        let mut scheduler = Self {
            settings,
            state,
            checker,
            notifier,
        };
        scheduler.start(now);
        scheduler
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot::new(self.state.clone(), self.settings.clone())
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// (Re)start the cycle in the waiting phase with the configured interval
    pub fn start(&mut self, now: Instant) {
        let next = compute_next_reminder_timestamp(Local::now(), self.settings.reminder_interval);
        info!(
            "Started reminder timer ({}s), next reminder at {}",
            self.settings.reminder_interval, next
        );

        self.state = ScheduleState::waiting(now, self.settings.reminder_duration(), next);
        self.notifier.set_tooltip(&self.state.next_reminder);
        self.notifier.stop_animation();
    }

    fn start_cooldown(&mut self, now: Instant) {
        info!("Started cooldown timer ({}s)", self.settings.cooldown_interval);
        self.state
            .restart(TimerPhase::Cooldown, now, self.settings.cooldown_duration());
        self.notifier.start_animation();
    }

    /// Dispatch an expired phase timer and return the phase now running
    pub async fn on_timer_expired(&mut self, now: Instant) -> TimerPhase {
        match self.state.phase {
            TimerPhase::Waiting => self.on_waiting_expired(now).await,
            TimerPhase::Cooldown => self.on_cooldown_expired(now).await,
        }
        self.state.phase
    }

    /// The waiting timer elapsed: remind, or skip and wait another interval
    pub async fn on_waiting_expired(&mut self, now: Instant) {
        if let Some(reason) = self.check_suppression().await {
            info!("Reminder suppressed ({:?}), restarting reminder timer", reason);
            self.start(now);
            return;
        }

        self.notifier
            .show_reminder(self.settings.cooldown_interval, self.settings.sound_enabled);
        self.start_cooldown(now);
    }

    /// The cooldown elapsed: show the all-clear unless suppressed, then wait again
    pub async fn on_cooldown_expired(&mut self, now: Instant) {
        match self.check_suppression().await {
            Some(reason) => info!("Cooldown message suppressed ({:?})", reason),
            None => self.notifier.show_cooldown_ended(self.settings.sound_enabled),
        }
        self.start(now);
    }

    /// Advance the tray icon animation, no effect on the phase
    pub fn on_animation_pulse(&self) {
        if !self.notifier.animate_icon() {
            error!("Could not switch icon");
        }
    }

    /// Evaluate the suppression chain in order: idle, microphone, windows.
    ///
    /// A failing query counts as "not suppressed".
    pub async fn check_suppression(&self) -> Option<Suppression> {
        let idle = self.checker.is_idle(self.settings.idle_duration()).await;
        if fail_open("idle", idle) {
            return Some(Suppression::Idle);
        }

        if self.settings.suppress_on_mic {
            let mic = self.checker.is_microphone_active().await;
            if fail_open("microphone", mic) {
                return Some(Suppression::Microphone);
            }
        }

        let window = self
            .checker
            .is_blacklisted_window_open(&self.settings.blacklisted_windows)
            .await;
        if fail_open("window", window) {
            return Some(Suppression::BlacklistedWindow);
        }

        None
    }

    /// Reload settings from the provider.
    ///
    /// On success the settings are replaced and the cycle restarts in the
    /// waiting phase. On failure nothing changes and the error is returned.
    pub fn reload<P>(&mut self, provider: &P, now: Instant) -> Result<(), ConfigError>
    where
        P: SettingsProvider + ?Sized,
    {
        let loaded = provider.load().and_then(|settings| {
            settings.validate()?;
            Ok(settings)
        });

        match loaded {
            Ok(settings) => {
                self.settings = settings;
                self.start(now);
                self.notifier.show_config_reloaded();
                info!("Config reloaded");
                Ok(())
            }
            Err(e) => {
                error!("Invalid config, keeping current settings: {}", e);
                self.notifier.show_bad_config(&e);
                Err(e)
            }
        }
    }
}

fn fail_open(check: &str, result: Result<bool, QueryError>) -> bool {
    match result {
        Ok(active) => {
            debug!("{} check: {}", check, active);
            active
        }
        Err(e) => {
            warn!("{} check failed, not suppressing: {}", check, e);
            false
        }
    }
}

/// Local wall-clock time of the next reminder, `HH:MM`
pub fn compute_next_reminder_timestamp(now: DateTime<Local>, interval_secs: u64) -> String {
    chrono::Duration::try_seconds(i64::try_from(interval_secs).unwrap_or(i64::MAX))
        .and_then(|interval| now.checked_add_signed(interval))
        .map(|next| next.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
