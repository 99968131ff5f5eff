pub mod dashboard;
pub mod health;
pub mod rate_limit;
pub mod readmes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /readmes/generate                    start a generation, stream NDJSON (POST)
/// /readmes/recent                      signed-in user's history (GET)
/// /readmes/{owner}/{repo}              latest README for a repository (GET)
/// /readmes/{owner}/{repo}/{short_id}   one generation (GET), owner edit (PATCH)
///
/// /rate-limit                          caller's quota standing (GET)
///
/// /dashboard                           recent generations + usage (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // README generation and retrieval.
        .nest("/readmes", readmes::router())
        // Quota standing for the current caller.
        .merge(rate_limit::router())
        // Signed-in dashboard aggregate.
        .merge(dashboard::router())
}
