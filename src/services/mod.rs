//! External collaborators module
//!
//! This module contains everything the scheduler talks to outside the
//! process: condition queries, notifications, the autostart desktop entry
//! and other system operations.

pub mod autostart;
pub mod conditions;
pub mod notifier;
pub mod system;

// Re-export main types and functions
pub use autostart::{Autostart, DesktopEntryAutostart};
pub use conditions::{ConditionChecker, SystemConditions};
pub use notifier::{DesktopNotifier, Notifier, NotifierConfig};
pub use system::*;
