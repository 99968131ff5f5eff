//! Daily quota checks shared by the rate-limit endpoint and the pipeline.

use std::sync::Arc;

use gitscribe_core::{ChargeOutcome, Identity, QuotaLimits, RateLimitInfo};
use gitscribe_db::store::QuotaStore;

/// Applies the configured daily ceilings to an optionally-resolved caller.
///
/// A caller with no resolvable identity is denied rather than given an
/// open-ended allowance, and reads back a zeroed snapshot.
#[derive(Clone)]
pub struct RateLimiter {
    quota: Arc<dyn QuotaStore>,
    limits: QuotaLimits,
}

impl RateLimiter {
    pub fn new(quota: Arc<dyn QuotaStore>, limits: QuotaLimits) -> Self {
        Self { quota, limits }
    }

    /// Today's standing without charging anything.
    pub async fn current(
        &self,
        identity: Option<&Identity>,
    ) -> Result<RateLimitInfo, sqlx::Error> {
        match identity {
            Some(identity) => self.quota.current(identity, &self.limits).await,
            None => Ok(RateLimitInfo::unresolved(self.limits.anonymous)),
        }
    }

    /// Atomically charge one generation attempt.
    pub async fn charge(
        &self,
        identity: Option<&Identity>,
    ) -> Result<ChargeOutcome, sqlx::Error> {
        match identity {
            Some(identity) => self.quota.check_and_increment(identity, &self.limits).await,
            None => Ok(ChargeOutcome::unresolved(&self.limits)),
        }
    }
}
