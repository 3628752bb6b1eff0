//! Background tasks module
//!
//! This module contains the tasks that run alongside the control API: the
//! reminder timer loop and the SIGHUP reload listener.

pub mod reload_signal;
pub mod reminder_timer;

// Re-export main functions
pub use reload_signal::reload_signal_task;
pub use reminder_timer::{reminder_timer_task, CommandReply, SchedulerCommand};
