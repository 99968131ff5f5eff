//! Handler for the signed-in user's dashboard.
//!
//! One aggregate endpoint: recent generations plus today's usage, so the
//! dashboard page needs a single round trip.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use gitscribe_core::types::Timestamp;
use gitscribe_core::Identity;
use gitscribe_db::models::generated_readme::GeneratedReadme;
use gitscribe_db::store::{QuotaStore, ReadmeStore};

use crate::error::AppResult;
use crate::handlers::readmes::RECENT_README_LIMIT;
use crate::middleware::RequireUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Aggregate payload for `GET /dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    /// Most recent generations, newest first.
    pub readmes: Vec<GeneratedReadme>,
    pub usage: UsageData,
}

#[derive(Debug, Serialize)]
pub struct UsageData {
    /// Generations charged against today's quota.
    pub generations_today: i32,
    /// When the newest generation happened, if any.
    pub last_generated: Option<Timestamp>,
}

/// GET /api/v1/dashboard
pub async fn overview(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> AppResult<impl IntoResponse> {
    let identity = Identity::User(user_id);

    let readmes = state
        .readmes
        .list_recent_for_user(user_id, RECENT_README_LIMIT)
        .await?;
    let info = state.quota.current(&identity, &state.config.limits()).await?;

    let last_generated = readmes.first().map(|readme| readme.created_at);

    Ok(Json(DataResponse {
        data: DashboardData {
            readmes,
            usage: UsageData {
                generations_today: info.used,
                last_generated,
            },
        },
    }))
}
