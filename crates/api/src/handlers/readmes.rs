//! Handlers for persisted README retrieval and editing.
//!
//! Generated documents are keyed by `(repo_path, short_id)`; the path
//! params go through the same parser as generation input, so lookups are
//! case-insensitive and reject malformed owner/repo segments outright.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use gitscribe_core::RepoRef;
use gitscribe_db::models::generated_readme::UpdateGeneratedReadme;
use gitscribe_db::store::ReadmeStore;

use crate::error::{AppError, AppResult};
use crate::middleware::RequireUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Page size for the signed-in user's history.
pub const RECENT_README_LIMIT: i64 = 20;

/// Normalize `{owner}/{repo}` path params to the persistence key.
fn repo_path_param(owner: &str, repo: &str) -> Result<String, AppError> {
    Ok(RepoRef::parse(&format!("{owner}/{repo}"))?.path())
}

/// GET /api/v1/readmes/{owner}/{repo}
///
/// The newest generation for the repository, across all users.
pub async fn latest(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let repo_path = repo_path_param(&owner, &repo)?;
    let readme = state
        .readmes
        .find_latest(&repo_path)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No README found for {repo_path}")))?;

    Ok(Json(DataResponse { data: readme }))
}

/// GET /api/v1/readmes/{owner}/{repo}/{short_id}
pub async fn by_short_id(
    State(state): State<AppState>,
    Path((owner, repo, short_id)): Path<(String, String, String)>,
) -> AppResult<impl IntoResponse> {
    let repo_path = repo_path_param(&owner, &repo)?;
    let readme = state
        .readmes
        .find_by_path_and_short_id(&repo_path, &short_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No README found for {repo_path} with id {short_id}"))
        })?;

    Ok(Json(DataResponse { data: readme }))
}

/// PATCH /api/v1/readmes/{owner}/{repo}/{short_id}
///
/// Owner-gated content edit. A row that exists but belongs to someone
/// else (or to nobody) reads as 404, the same as a missing row.
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path((owner, repo, short_id)): Path<(String, String, String)>,
    Json(input): Json<UpdateGeneratedReadme>,
) -> AppResult<impl IntoResponse> {
    let repo_path = repo_path_param(&owner, &repo)?;
    let readme = state
        .readmes
        .update_content(&repo_path, &short_id, user_id, &input.content)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No README found for {repo_path} with id {short_id}"))
        })?;

    Ok(Json(DataResponse { data: readme }))
}

/// GET /api/v1/readmes/recent
///
/// The signed-in user's most recent generations, newest first.
pub async fn recent(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> AppResult<impl IntoResponse> {
    let readmes = state
        .readmes
        .list_recent_for_user(user_id, RECENT_README_LIMIT)
        .await?;

    Ok(Json(DataResponse { data: readmes }))
}
