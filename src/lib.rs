//! Eyecare Reminder - reminds you to rest your eyes at configurable intervals
//! 
//! This library provides the reminder scheduler, the system condition checks
//! that suppress reminders, the YAML settings file, desktop notifications and
//! a small local HTTP API to control the running daemon.

pub mod api;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod services;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::{AppPaths, Config};
pub use error::{ConfigError, QueryError};
pub use scheduler::Scheduler;
pub use settings::Settings;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
