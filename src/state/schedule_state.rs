//! Reminder schedule state

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::settings::Settings;

/// Stand-in deadline when `now + interval` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Phase of the reminder cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// Counting down to the next reminder
    Waiting,
    /// The user is looking away, ends with the all-clear message
    Cooldown,
}

/// State of the running phase timer
#[derive(Debug, Clone)]
pub struct ScheduleState {
    pub phase: TimerPhase,
    /// When the running phase timer expires
    pub deadline: Instant,
    /// Interval the running phase timer was started with
    pub interval: Duration,
    /// Display text for the next reminder, advisory only
    pub next_reminder: String,
}

impl ScheduleState {
    /// Create a waiting state whose timer was started at `now`
    pub fn waiting(now: Instant, interval: Duration, next_reminder: String) -> Self {
        Self {
            phase: TimerPhase::Waiting,
            deadline: deadline_after(now, interval),
            interval,
            next_reminder,
        }
    }

    /// Restart the timer in the given phase
    pub fn restart(&mut self, phase: TimerPhase, now: Instant, interval: Duration) {
        self.phase = phase;
        self.interval = interval;
        self.deadline = deadline_after(now, interval);
    }

    /// Time left until the phase timer expires
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn is_cooldown(&self) -> bool {
        self.phase == TimerPhase::Cooldown
    }
}

fn deadline_after(now: Instant, interval: Duration) -> Instant {
    now.checked_add(interval)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Read-only copy of the scheduler published after every transition
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    pub state: ScheduleState,
    pub settings: Settings,
}

impl ScheduleSnapshot {
    pub fn new(state: ScheduleState, settings: Settings) -> Self {
        Self { state, settings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_counts_down() {
        let now = Instant::now();
        let state = ScheduleState::waiting(now, Duration::from_secs(60), "10:01".to_string());

        assert_eq!(state.remaining(now), Duration::from_secs(60));
        assert_eq!(state.remaining(now + Duration::from_secs(45)), Duration::from_secs(15));
        assert_eq!(state.remaining(now + Duration::from_secs(90)), Duration::ZERO);
        assert!(!state.is_expired(now + Duration::from_secs(59)));
        assert!(state.is_expired(now + Duration::from_secs(60)));
    }

    #[test]
    fn test_restart_switches_phase() {
        let now = Instant::now();
        let mut state = ScheduleState::waiting(now, Duration::from_secs(60), String::new());

        let later = now + Duration::from_secs(60);
        state.restart(TimerPhase::Cooldown, later, Duration::from_secs(20));
        assert!(state.is_cooldown());
        assert_eq!(state.interval, Duration::from_secs(20));
        assert_eq!(state.remaining(later), Duration::from_secs(20));
    }

    #[test]
    fn test_unrepresentable_deadline_does_not_panic() {
        let now = Instant::now();
        let mut state = ScheduleState::waiting(now, Duration::MAX, String::new());
        assert!(state.deadline > now);

        state.restart(TimerPhase::Cooldown, now, Duration::from_secs(u64::MAX));
        assert!(!state.is_expired(now + Duration::from_secs(3600)));
    }
}
