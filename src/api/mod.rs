//! HTTP control API module
//!
//! Local endpoints that take the place of a tray menu: status, config
//! reload/reset, autostart toggle, and opening the config or log file.
//! Browser cross-origin requests are refused, and state-changing requests
//! must carry the [`guard::CLIENT_HEADER`] header.

pub mod guard;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use guard::local_clients_only;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/reload", post(reload_handler))
        .route("/reset", post(reset_handler))
        .route("/autostart", get(autostart_handler))
        .route("/autostart/toggle", post(autostart_toggle_handler))
        .route("/config/edit", post(edit_config_handler))
        .route("/log/open", post(open_log_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(local_clients_only))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
