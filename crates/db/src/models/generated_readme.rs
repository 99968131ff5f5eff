//! Persisted generation results.

use gitscribe_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One generated README. `(repo_path, short_id)` is unique; several rows
/// may exist for the same repository path, one per generation.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct GeneratedReadme {
    pub id: DbId,
    /// Normalized lowercase `owner/repo`.
    pub repo_path: String,
    pub short_id: String,
    pub content: String,
    /// `None` for anonymous generations. Ownership gates edits, not reads.
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload written once per successful generation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGeneratedReadme {
    pub repo_path: String,
    pub short_id: String,
    pub content: String,
    pub user_id: Option<DbId>,
}

/// Patch payload for the owner-gated content edit.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGeneratedReadme {
    pub content: String,
}
