//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    settings::Settings,
    state::{TimerPhase, TrayState},
};

/// API response structure for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, settings: Option<Settings>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            settings,
        }
    }

    /// Create a success response
    pub fn ok(message: String, settings: Option<Settings>) -> Self {
        Self::new("ok", message, settings)
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error", message, None)
    }
}

/// Status response with schedule and tray information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub phase: TimerPhase,
    pub remaining_seconds: u64,
    /// Length of the running phase timer
    pub interval_seconds: u64,
    pub next_reminder: String,
    pub tray: TrayState,
    pub settings: Settings,
    pub autostart: Option<bool>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Autostart flag response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutostartResponse {
    pub enabled: bool,
    pub timestamp: DateTime<Utc>,
}

impl AutostartResponse {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
