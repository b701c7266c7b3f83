//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting the admin routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;

use crate::web::state::AppState;
use fitclub_core::ports::PortError;

/// Name of the cookie carrying the admin session id.
pub const SESSION_COOKIE: &str = "session";

/// Extracts the admin session id from `Authorization: Bearer` or the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
                .filter(|t| !t.is_empty())
        })
}

/// Middleware that validates the admin session and extracts the admin id.
///
/// If valid, inserts the admin id into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_session_id = session_token(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let admin_id = state
        .db
        .validate_auth_session(auth_session_id)
        .await
        .map_err(|e| match e {
            PortError::Unauthorized => StatusCode::UNAUTHORIZED,
            other => {
                error!("Failed to validate auth session: {:?}", other);
                StatusCode::UNAUTHORIZED
            }
        })?;

    req.extensions_mut().insert(admin_id);

    Ok(next.run(req).await)
}
