//! Route definitions for README generation and retrieval.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{generate, readmes};
use crate::state::AppState;

/// README routes mounted at `/readmes`.
///
/// ```text
/// POST  /generate                     -> generate (NDJSON stream)
/// GET   /recent                       -> recent (auth required)
/// GET   /{owner}/{repo}               -> latest
/// GET   /{owner}/{repo}/{short_id}    -> by_short_id
/// PATCH /{owner}/{repo}/{short_id}    -> update (auth required, owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate::generate))
        .route("/recent", get(readmes::recent))
        .route("/{owner}/{repo}", get(readmes::latest))
        .route(
            "/{owner}/{repo}/{short_id}",
            get(readmes::by_short_id).patch(readmes::update),
        )
}
