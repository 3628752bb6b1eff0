//! HTTP endpoint handlers

use std::{path::Path, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::{
    error::{AutostartError, ConfigError},
    services::open_with_default_app,
    settings::Settings,
    state::AppState,
};
use super::responses::{ApiResponse, AutostartResponse, HealthResponse, StatusResponse};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiResponse>)>;

fn failure(status: StatusCode, message: String) -> (StatusCode, Json<ApiResponse>) {
    (status, Json(ApiResponse::error(message)))
}

/// Map the outcome of a config command onto a response
fn config_outcome(
    outcome: Result<Result<Settings, ConfigError>, String>,
    success: &str,
) -> ApiResult<ApiResponse> {
    match outcome {
        Ok(Ok(settings)) => {
            info!("{}", success);
            Ok(Json(ApiResponse::ok(success.to_string(), Some(settings))))
        }
        Ok(Err(e)) => {
            warn!("Config rejected: {}", e);
            Err(failure(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        }
        Err(e) => {
            error!("{}", e);
            Err(failure(StatusCode::INTERNAL_SERVER_ERROR, e))
        }
    }
}

fn autostart_failure(e: AutostartError) -> (StatusCode, Json<ApiResponse>) {
    let status = match e {
        AutostartError::NotInstalled(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!("Autostart error: {}", e);
    failure(status, e.to_string())
}

async fn open_file(path: &Path) -> ApiResult<ApiResponse> {
    match open_with_default_app(path).await {
        Ok(()) => Ok(Json(ApiResponse::ok(format!("Opened {}", path.display()), None))),
        Err(e) => {
            error!("{}", e);
            Err(failure(StatusCode::INTERNAL_SERVER_ERROR, e))
        }
    }
}

/// Handle POST /reload - Reload the config file and restart the cycle
pub async fn reload_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    config_outcome(state.reload_config().await, "Config successfully reloaded")
}

/// Handle POST /reset - Restore the default config and restart the cycle
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    config_outcome(state.reset_config().await, "Config reset to defaults")
}

/// Handle GET /autostart - Report whether the app starts with the session
pub async fn autostart_handler(State(state): State<Arc<AppState>>) -> ApiResult<AutostartResponse> {
    state
        .autostart
        .is_autostart_enabled()
        .map(|enabled| Json(AutostartResponse::new(enabled)))
        .map_err(autostart_failure)
}

/// Handle POST /autostart/toggle - Flip the autostart flag
pub async fn autostart_toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult<AutostartResponse> {
    state
        .toggle_autostart()
        .map(|enabled| Json(AutostartResponse::new(enabled)))
        .map_err(autostart_failure)
}

/// Handle POST /config/edit - Open the config file for editing
pub async fn edit_config_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    state.record_action("edit-config");
    open_file(&state.paths.config_file).await
}

/// Handle POST /log/open - Open the log file
pub async fn open_log_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    state.record_action("open-log");
    open_file(&state.paths.log_file).await
}

/// Handle GET /status - Return the current schedule
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = state.get_snapshot();

    let tray = match state.get_tray_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get tray state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        phase: snapshot.state.phase,
        remaining_seconds: snapshot.state.remaining(Instant::now()).as_secs(),
        interval_seconds: snapshot.state.interval.as_secs(),
        next_reminder: snapshot.state.next_reminder,
        tray,
        settings: snapshot.settings,
        autostart: state.autostart_enabled(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
