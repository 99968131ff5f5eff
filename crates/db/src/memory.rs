//! In-memory store implementations.
//!
//! These honor the same contracts as the Postgres stores: the charge is an
//! atomic check-and-increment, refunds floor at zero and never create
//! records, and `(repo_path, short_id)` stays unique. Integration tests
//! run the full pipeline against them, so no test needs a live database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use gitscribe_core::types::DbId;
use gitscribe_core::{ChargeOutcome, Identity, QuotaLimits, RateLimitInfo};

use crate::models::generated_readme::{CreateGeneratedReadme, GeneratedReadme};
use crate::store::{QuotaStore, ReadmeStore};

// ---------------------------------------------------------------------------
// Quota
// ---------------------------------------------------------------------------

/// Counter map keyed by identity. Holds a single day's view; day rollover
/// does not apply here.
#[derive(Debug, Default)]
pub struct MemoryQuotaStore {
    counts: Mutex<HashMap<Identity, i32>>,
}

impl MemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a used count, e.g. to start a test at the ceiling.
    pub fn set_used(&self, identity: Identity, used: i32) {
        self.counts.lock().unwrap().insert(identity, used);
    }

    pub fn used(&self, identity: &Identity) -> i32 {
        self.counts.lock().unwrap().get(identity).copied().unwrap_or(0)
    }
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn current(
        &self,
        identity: &Identity,
        limits: &QuotaLimits,
    ) -> Result<RateLimitInfo, sqlx::Error> {
        let total = limits.ceiling_for(identity);
        Ok(RateLimitInfo::from_used(total, self.used(identity)))
    }

    async fn check_and_increment(
        &self,
        identity: &Identity,
        limits: &QuotaLimits,
    ) -> Result<ChargeOutcome, sqlx::Error> {
        let ceiling = limits.ceiling_for(identity);
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(identity.clone()).or_insert(0);
        if *count >= ceiling {
            return Ok(ChargeOutcome::exhausted(limits, identity));
        }
        *count += 1;
        Ok(ChargeOutcome::Charged(RateLimitInfo::from_used(
            ceiling, *count,
        )))
    }

    async fn increment(&self, identity: &Identity) -> Result<(), sqlx::Error> {
        let mut counts = self.counts.lock().unwrap();
        *counts.entry(identity.clone()).or_insert(0) += 1;
        Ok(())
    }

    async fn refund(&self, identity: &Identity) -> Result<(), sqlx::Error> {
        let mut counts = self.counts.lock().unwrap();
        if let Some(count) = counts.get_mut(identity) {
            if *count > 0 {
                *count -= 1;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Readmes
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryReadmeStore {
    rows: Mutex<Vec<GeneratedReadme>>,
}

impl MemoryReadmeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ReadmeStore for MemoryReadmeStore {
    async fn insert(&self, input: &CreateGeneratedReadme) -> Result<GeneratedReadme, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|r| r.repo_path == input.repo_path && r.short_id == input.short_id)
        {
            return Err(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint \
                 \"uq_generated_readmes_repo_short\""
                    .into(),
            ));
        }

        let now = Utc::now();
        let row = GeneratedReadme {
            id: rows.len() as DbId + 1,
            repo_path: input.repo_path.clone(),
            short_id: input.short_id.clone(),
            content: input.content.clone(),
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn short_id_exists(
        &self,
        repo_path: &str,
        short_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .any(|r| r.repo_path == repo_path && r.short_id == short_id))
    }

    async fn find_by_path_and_short_id(
        &self,
        repo_path: &str,
        short_id: &str,
    ) -> Result<Option<GeneratedReadme>, sqlx::Error> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.repo_path == repo_path && r.short_id == short_id)
            .cloned())
    }

    async fn find_latest(&self, repo_path: &str) -> Result<Option<GeneratedReadme>, sqlx::Error> {
        // Insertion order stands in for created_at ordering.
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().rev().find(|r| r.repo_path == repo_path).cloned())
    }

    async fn list_recent_for_user(
        &self,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<GeneratedReadme>, sqlx::Error> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.user_id == Some(user_id))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_content(
        &self,
        repo_path: &str,
        short_id: &str,
        owner: DbId,
        content: &str,
    ) -> Result<Option<GeneratedReadme>, sqlx::Error> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|r| {
            r.repo_path == repo_path && r.short_id == short_id && r.user_id == Some(owner)
        });
        Ok(row.map(|r| {
            r.content = content.to_string();
            r.updated_at = Utc::now();
            r.clone()
        }))
    }
}
