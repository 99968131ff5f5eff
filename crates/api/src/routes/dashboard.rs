//! Route definition for the signed-in dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// ```text
/// GET /dashboard -> overview (auth required)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard::overview))
}
