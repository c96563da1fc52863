//! Admin bearer-token check.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::routes::ErrorResponse;
use crate::state::AppState;

/// Reject the request unless it carries `Authorization: Bearer <admin_token>`.
/// With no token configured, admin routes are closed entirely.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match (state.config.admin_token.as_deref(), presented) {
        (Some(expected), Some(token)) if !expected.is_empty() && token == expected => {
            next.run(request).await
        }
        _ => {
            warn!(path = %request.uri().path(), "Rejected admin request");
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Unauthorized")),
            )
                .into_response()
        }
    }
}
