//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod schedule_state;
pub mod tray_state;

// Re-export main types
pub use app_state::AppState;
pub use schedule_state::{ScheduleSnapshot, ScheduleState, TimerPhase};
pub use tray_state::{TrayIcon, TrayState};
