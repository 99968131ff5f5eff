//! Handler for the quota standing endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use gitscribe_core::Identity;

use crate::error::AppResult;
use crate::generation::RateLimiter;
use crate::middleware::OptionalIdentity;
use crate::response::DataResponse;
use crate::state::AppState;

/// Today's quota standing for the caller.
#[derive(Debug, Serialize)]
pub struct RateLimitData {
    pub remaining: i32,
    pub total: i32,
    pub used: i32,
    pub is_authenticated: bool,
}

/// GET /api/v1/rate-limit
///
/// Works for signed-in and anonymous callers alike; a caller with no
/// resolvable identity reads back zero remaining.
pub async fn current(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
) -> AppResult<impl IntoResponse> {
    let limiter = RateLimiter::new(state.quota.clone(), state.config.limits());
    let info = limiter.current(identity.as_ref()).await?;

    Ok(Json(DataResponse {
        data: RateLimitData {
            remaining: info.remaining,
            total: info.total,
            used: info.used,
            is_authenticated: identity.as_ref().is_some_and(Identity::is_authenticated),
        },
    }))
}
