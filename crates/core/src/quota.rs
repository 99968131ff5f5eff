//! Quota bookkeeping types.
//!
//! A quota is a per-identity, per-calendar-day ceiling on generation
//! attempts. The ceilings themselves are server configuration; this module
//! only defines the shapes that move between the store, the service layer,
//! and the client.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::identity::Identity;

/// Message used when neither a session nor a client address could be
/// resolved. Such callers are denied rather than given an open-ended
/// allowance.
pub const NO_IDENTITY_MESSAGE: &str = "Could not determine user identity for rate limiting.";

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One identity's quota standing for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub remaining: i32,
    pub total: i32,
    pub used: i32,
}

impl RateLimitInfo {
    /// Snapshot derived from a used count (which may be zero when no row
    /// exists yet for today).
    pub fn from_used(total: i32, used: i32) -> Self {
        Self {
            remaining: total - used,
            total,
            used,
        }
    }

    /// Snapshot for a fully spent ceiling.
    pub fn depleted(total: i32) -> Self {
        Self {
            remaining: 0,
            total,
            used: total,
        }
    }

    /// Snapshot for an unresolvable caller: nothing remaining, nothing used.
    pub fn unresolved(total: i32) -> Self {
        Self {
            remaining: 0,
            total,
            used: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Ceilings
// ---------------------------------------------------------------------------

/// Daily generation ceilings, one per identity class. Values come from
/// server configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    pub authenticated: i32,
    pub anonymous: i32,
}

impl QuotaLimits {
    pub fn ceiling_for(&self, identity: &Identity) -> i32 {
        match identity {
            Identity::User(_) => self.authenticated,
            Identity::Ip(_) => self.anonymous,
        }
    }

    /// The message shown when the given identity's ceiling is spent.
    /// Anonymous callers are told that signing in raises the ceiling.
    pub fn exhausted_message(&self, identity: &Identity) -> String {
        match identity {
            Identity::User(_) => format!(
                "You have reached your daily limit of {} generations. \
                 Please try again tomorrow.",
                self.authenticated
            ),
            Identity::Ip(_) => format!(
                "You have reached your daily limit of {} generations. \
                 Please sign in to get {} generations per day, or try again tomorrow.",
                self.anonymous, self.authenticated
            ),
        }
    }
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            authenticated: 20,
            anonymous: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Charge outcome
// ---------------------------------------------------------------------------

/// Result of an atomic charge attempt against the quota store.
#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    /// The counter was incremented; snapshot reflects the post-charge state.
    Charged(RateLimitInfo),
    /// The ceiling was already reached (or the caller is unresolvable);
    /// nothing was written.
    Denied(ApiError),
}

impl ChargeOutcome {
    /// Denial for a spent ceiling, carrying the exhausted snapshot.
    pub fn exhausted(limits: &QuotaLimits, identity: &Identity) -> Self {
        let total = limits.ceiling_for(identity);
        ChargeOutcome::Denied(ApiError::rate_limit(
            RateLimitInfo::depleted(total),
            limits.exhausted_message(identity),
        ))
    }

    /// Denial for a caller with no resolvable identity.
    pub fn unresolved(limits: &QuotaLimits) -> Self {
        ChargeOutcome::Denied(ApiError::rate_limit(
            RateLimitInfo::unresolved(limits.anonymous),
            NO_IDENTITY_MESSAGE,
        ))
    }
}
