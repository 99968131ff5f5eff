//! Storage seams between the service layer and Postgres.
//!
//! The generation pipeline talks to these traits rather than to the
//! repositories directly, so the quota race-safety and refund properties
//! can be exercised against in-memory implementations without a live
//! database. The Postgres implementations are thin wrappers over the
//! repository layer.

use async_trait::async_trait;
use gitscribe_core::short_id::{
    generate_short_id, FALLBACK_SHORT_ID_LENGTH, MAX_SHORT_ID_ATTEMPTS, SHORT_ID_LENGTH,
};
use gitscribe_core::types::DbId;
use gitscribe_core::{ChargeOutcome, Identity, QuotaLimits, RateLimitInfo};
use sqlx::PgPool;

use crate::models::generated_readme::{CreateGeneratedReadme, GeneratedReadme};
use crate::repositories::{RateLimitRepo, ReadmeRepo};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Quota bookkeeping. All mutations are atomic with respect to concurrent
/// callers for the same identity.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Read-only snapshot of today's standing.
    async fn current(
        &self,
        identity: &Identity,
        limits: &QuotaLimits,
    ) -> Result<RateLimitInfo, sqlx::Error>;

    /// Charge one generation if the ceiling allows it.
    async fn check_and_increment(
        &self,
        identity: &Identity,
        limits: &QuotaLimits,
    ) -> Result<ChargeOutcome, sqlx::Error>;

    /// Ceilingless increment. Callers verify quota separately and refund
    /// on failure.
    async fn increment(&self, identity: &Identity) -> Result<(), sqlx::Error>;

    /// Credit back one failed charge. No-op when nothing was charged today.
    async fn refund(&self, identity: &Identity) -> Result<(), sqlx::Error>;
}

/// Persisted generation results.
#[async_trait]
pub trait ReadmeStore: Send + Sync {
    async fn insert(&self, input: &CreateGeneratedReadme) -> Result<GeneratedReadme, sqlx::Error>;

    async fn short_id_exists(&self, repo_path: &str, short_id: &str)
        -> Result<bool, sqlx::Error>;

    async fn find_by_path_and_short_id(
        &self,
        repo_path: &str,
        short_id: &str,
    ) -> Result<Option<GeneratedReadme>, sqlx::Error>;

    async fn find_latest(&self, repo_path: &str) -> Result<Option<GeneratedReadme>, sqlx::Error>;

    async fn list_recent_for_user(
        &self,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<GeneratedReadme>, sqlx::Error>;

    /// Owner-gated content edit. `None` when no row matches the path,
    /// short id, and owner together.
    async fn update_content(
        &self,
        repo_path: &str,
        short_id: &str,
        owner: DbId,
        content: &str,
    ) -> Result<Option<GeneratedReadme>, sqlx::Error>;
}

// ---------------------------------------------------------------------------
// Short id allocation
// ---------------------------------------------------------------------------

/// Allocate a short id not yet used for `repo_path`.
///
/// Makes up to [`MAX_SHORT_ID_ATTEMPTS`] collision-checked draws at the
/// default length, then settles on one longer draw instead of erroring.
/// Collisions at the default length are already vanishingly rare; the
/// fallback keeps the failure mode deterministic.
pub async fn allocate_unique_short_id(
    store: &dyn ReadmeStore,
    repo_path: &str,
) -> Result<String, sqlx::Error> {
    for _ in 0..MAX_SHORT_ID_ATTEMPTS {
        let candidate = generate_short_id(SHORT_ID_LENGTH);
        if !store.short_id_exists(repo_path, &candidate).await? {
            return Ok(candidate);
        }
    }

    tracing::warn!(
        repo_path = %repo_path,
        attempts = MAX_SHORT_ID_ATTEMPTS,
        "short id space congested, falling back to longer id"
    );
    Ok(generate_short_id(FALLBACK_SHORT_ID_LENGTH))
}

// ---------------------------------------------------------------------------
// Postgres implementations
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgQuotaStore {
    pool: PgPool,
}

impl PgQuotaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaStore for PgQuotaStore {
    async fn current(
        &self,
        identity: &Identity,
        limits: &QuotaLimits,
    ) -> Result<RateLimitInfo, sqlx::Error> {
        let total = limits.ceiling_for(identity);
        let used = RateLimitRepo::current_count(&self.pool, identity).await?;
        Ok(RateLimitInfo::from_used(total, used))
    }

    async fn check_and_increment(
        &self,
        identity: &Identity,
        limits: &QuotaLimits,
    ) -> Result<ChargeOutcome, sqlx::Error> {
        let ceiling = limits.ceiling_for(identity);
        match RateLimitRepo::check_and_increment(&self.pool, identity, ceiling).await? {
            Some(count) => Ok(ChargeOutcome::Charged(RateLimitInfo::from_used(
                ceiling, count,
            ))),
            None => Ok(ChargeOutcome::exhausted(limits, identity)),
        }
    }

    async fn increment(&self, identity: &Identity) -> Result<(), sqlx::Error> {
        RateLimitRepo::increment(&self.pool, identity).await?;
        Ok(())
    }

    async fn refund(&self, identity: &Identity) -> Result<(), sqlx::Error> {
        let touched = RateLimitRepo::refund(&self.pool, identity).await?;
        if touched == 0 {
            tracing::debug!(identity = %identity, "refund found no charge to credit back");
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgReadmeStore {
    pool: PgPool,
}

impl PgReadmeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadmeStore for PgReadmeStore {
    async fn insert(&self, input: &CreateGeneratedReadme) -> Result<GeneratedReadme, sqlx::Error> {
        ReadmeRepo::create(&self.pool, input).await
    }

    async fn short_id_exists(
        &self,
        repo_path: &str,
        short_id: &str,
    ) -> Result<bool, sqlx::Error> {
        ReadmeRepo::short_id_exists(&self.pool, repo_path, short_id).await
    }

    async fn find_by_path_and_short_id(
        &self,
        repo_path: &str,
        short_id: &str,
    ) -> Result<Option<GeneratedReadme>, sqlx::Error> {
        ReadmeRepo::find_by_path_and_short_id(&self.pool, repo_path, short_id).await
    }

    async fn find_latest(&self, repo_path: &str) -> Result<Option<GeneratedReadme>, sqlx::Error> {
        ReadmeRepo::find_latest(&self.pool, repo_path).await
    }

    async fn list_recent_for_user(
        &self,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<GeneratedReadme>, sqlx::Error> {
        ReadmeRepo::list_recent_for_user(&self.pool, user_id, limit).await
    }

    async fn update_content(
        &self,
        repo_path: &str,
        short_id: &str,
        owner: DbId,
        content: &str,
    ) -> Result<Option<GeneratedReadme>, sqlx::Error> {
        ReadmeRepo::update_content(&self.pool, repo_path, short_id, owner, content).await
    }
}
