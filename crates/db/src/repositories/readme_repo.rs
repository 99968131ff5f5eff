//! Repository for the `generated_readmes` table.

use gitscribe_core::types::DbId;
use sqlx::PgPool;

use crate::models::generated_readme::{CreateGeneratedReadme, GeneratedReadme};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, repo_path, short_id, content, user_id, created_at, updated_at";

/// Provides access to persisted generation results.
pub struct ReadmeRepo;

impl ReadmeRepo {
    /// Insert a completed generation, returning the created row.
    ///
    /// Always an insert; each generation gets a fresh row under its own
    /// short id. A duplicate `(repo_path, short_id)` pair violates
    /// `uq_generated_readmes_repo_short`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGeneratedReadme,
    ) -> Result<GeneratedReadme, sqlx::Error> {
        let query = format!(
            "INSERT INTO generated_readmes (repo_path, short_id, content, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeneratedReadme>(&query)
            .bind(&input.repo_path)
            .bind(&input.short_id)
            .bind(&input.content)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Fetch one exact generation by path and short id.
    pub async fn find_by_path_and_short_id(
        pool: &PgPool,
        repo_path: &str,
        short_id: &str,
    ) -> Result<Option<GeneratedReadme>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generated_readmes
             WHERE repo_path = $1 AND short_id = $2"
        );
        sqlx::query_as::<_, GeneratedReadme>(&query)
            .bind(repo_path)
            .bind(short_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the most recent generation for a repository path.
    pub async fn find_latest(
        pool: &PgPool,
        repo_path: &str,
    ) -> Result<Option<GeneratedReadme>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generated_readmes
             WHERE repo_path = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, GeneratedReadme>(&query)
            .bind(repo_path)
            .fetch_optional(pool)
            .await
    }

    /// List a user's generations, most recent first.
    pub async fn list_recent_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<GeneratedReadme>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generated_readmes
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, GeneratedReadme>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Whether a short id is already taken for a repository path.
    pub async fn short_id_exists(
        pool: &PgPool,
        repo_path: &str,
        short_id: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM generated_readmes
                 WHERE repo_path = $1 AND short_id = $2
             )",
        )
        .bind(repo_path)
        .bind(short_id)
        .fetch_one(pool)
        .await
    }

    /// Replace the content of one generation, gated by ownership.
    ///
    /// Returns `None` when no row matches, including when the row exists
    /// but belongs to a different user (or to nobody).
    pub async fn update_content(
        pool: &PgPool,
        repo_path: &str,
        short_id: &str,
        owner: DbId,
        content: &str,
    ) -> Result<Option<GeneratedReadme>, sqlx::Error> {
        let query = format!(
            "UPDATE generated_readmes SET
                content = $4,
                updated_at = now()
             WHERE repo_path = $1 AND short_id = $2 AND user_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeneratedReadme>(&query)
            .bind(repo_path)
            .bind(short_id)
            .bind(owner)
            .bind(content)
            .fetch_optional(pool)
            .await
    }
}
