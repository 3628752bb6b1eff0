//! Tray presentation state

use serde::{Deserialize, Serialize};

/// Icon currently shown for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrayIcon {
    Default,
    Attention,
}

/// What a tray icon would currently display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrayState {
    pub tooltip: String,
    pub icon: TrayIcon,
    pub animating: bool,
}

impl TrayState {
    pub fn new() -> Self {
        Self {
            tooltip: String::new(),
            icon: TrayIcon::Default,
            animating: false,
        }
    }

    /// Switch between the default and attention icon
    pub fn toggle_icon(&mut self) {
        self.icon = match self.icon {
            TrayIcon::Default => TrayIcon::Attention,
            TrayIcon::Attention => TrayIcon::Default,
        };
    }
}

impl Default for TrayState {
    fn default() -> Self {
        Self::new()
    }
}
