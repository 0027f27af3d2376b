use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::auth::security;
use crate::error::AppError;
use crate::web::{AppState, models::AuthenticatedUser};

pub async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Try the Authorization header first, then fall back to the cookie.
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| jar.get("token").map(|c| c.value().to_string()))
        .ok_or(AppError::InvalidCredentials)?;

    let claims = security::decode_access_token(&token, &state.config.secret_key).map_err(|e| {
        warn!(error = %e, "JWT decoding error during auth middleware");
        AppError::InvalidCredentials
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
        warn!(sub = %claims.sub, "invalid user ID in token subject");
        AppError::InvalidCredentials
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        id: user_id,
        email: claims.email,
    });
    Ok(next.run(req).await)
}
