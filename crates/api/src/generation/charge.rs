//! Refund-once bookkeeping for a charged generation attempt.

use std::sync::Arc;

use gitscribe_core::{Identity, RateLimitInfo};
use gitscribe_db::store::QuotaStore;

/// A generation attempt that has been charged against today's quota.
///
/// Every pipeline failure after the charge must credit the attempt back,
/// and no path may credit it twice. Holding the charge as a value with an
/// idempotent [`refund`](Charge::refund) keeps both rules in one place
/// instead of scattered across the pipeline's error arms.
pub struct Charge {
    quota: Arc<dyn QuotaStore>,
    identity: Identity,
    info: RateLimitInfo,
    refunded: bool,
}

impl Charge {
    pub fn new(quota: Arc<dyn QuotaStore>, identity: Identity, info: RateLimitInfo) -> Self {
        Self {
            quota,
            identity,
            info,
            refunded: false,
        }
    }

    /// The post-charge quota snapshot.
    pub fn info(&self) -> RateLimitInfo {
        self.info
    }

    /// Credit the attempt back. Only the first call reaches the store.
    ///
    /// Store errors are logged rather than propagated; the caller is
    /// already on a failure path and the original error is the one worth
    /// surfacing.
    pub async fn refund(&mut self) {
        if self.refunded {
            return;
        }
        self.refunded = true;

        if let Err(err) = self.quota.refund(&self.identity).await {
            tracing::error!(
                identity = %self.identity,
                error = %err,
                "failed to refund generation charge"
            );
        }
    }
}
