//! Identity extractors for Axum handlers.
//!
//! Quota accounting needs to know *who* is calling even when nobody is
//! signed in, so [`OptionalIdentity`] resolves best-effort: a valid JWT
//! Bearer token wins, otherwise the client IP from proxy headers, otherwise
//! nothing. [`RequireUser`] is the strict variant for endpoints that only
//! make sense for signed-in users.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use gitscribe_core::types::DbId;
use gitscribe_core::Identity;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Best-effort caller identity.
///
/// Resolution order:
///
/// 1. `Authorization: Bearer <jwt>` with a valid signature -> [`Identity::User`]
/// 2. `x-forwarded-for` (first hop) or `x-real-ip` -> [`Identity::Ip`]
/// 3. neither -> `None`
///
/// An invalid or expired token does not reject the request; the caller just
/// falls back to IP attribution. Never fails extraction.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequestParts<AppState> for OptionalIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user_id) = bearer_user_id(&parts.headers, state) {
            return Ok(OptionalIdentity(Some(Identity::User(user_id))));
        }

        Ok(OptionalIdentity(client_ip(&parts.headers).map(Identity::Ip)))
    }
}

/// Authenticated user id extracted from a JWT Bearer token.
///
/// Rejects with 401 when the header is missing, malformed, or the token does
/// not validate.
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub DbId);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        Ok(RequireUser(claims.sub))
    }
}

/// Decode a Bearer token if present and valid. Invalid tokens are logged at
/// debug level and ignored.
fn bearer_user_id(headers: &HeaderMap, state: &AppState) -> Option<DbId> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))?;

    match validate_token(token, &state.config.jwt) {
        Ok(claims) => Some(claims.sub),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring invalid bearer token");
            None
        }
    }
}

/// Extract the client IP from proxy headers.
///
/// Prefers the first (closest-to-client) hop of `x-forwarded-for`, then
/// `x-real-ip`. Returns `None` when neither header carries a usable value;
/// the socket address is not consulted because this service always sits
/// behind a proxy.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let trimmed = real_ip.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    None
}
