//! Request filter keeping the control API local to the user's own tools

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use tracing::warn;

use super::responses::ApiResponse;

/// Header every state-changing request must carry.
///
/// Browsers refuse to attach it cross-origin without a preflight, and the
/// router answers no preflight.
pub const CLIENT_HEADER: &str = "x-requested-with";

/// Refuse browser cross-origin requests and bare state-changing requests
pub async fn local_clients_only(request: Request, next: Next) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        warn!(
            "Refused {} {} from origin {:?}",
            request.method(),
            request.uri(),
            origin
        );
        return refuse("Cross-origin requests are not accepted".to_string());
    }

    let safe = matches!(*request.method(), Method::GET | Method::HEAD);
    if !safe && !request.headers().contains_key(CLIENT_HEADER) {
        warn!(
            "Refused {} {} without {} header",
            request.method(),
            request.uri(),
            CLIENT_HEADER
        );
        return refuse(format!("Missing {} header", CLIENT_HEADER));
    }

    next.run(request).await
}

fn refuse(message: String) -> Response {
    (StatusCode::FORBIDDEN, Json(ApiResponse::error(message))).into_response()
}
