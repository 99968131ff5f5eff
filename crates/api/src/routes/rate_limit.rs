//! Route definition for the quota standing endpoint.

use axum::routing::get;
use axum::Router;

use crate::handlers::rate_limit;
use crate::state::AppState;

/// ```text
/// GET /rate-limit -> current
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/rate-limit", get(rate_limit::current))
}
