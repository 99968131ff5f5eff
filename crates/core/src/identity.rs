//! Caller identity used as the quota key.

use std::fmt;

use crate::types::DbId;

/// Who is being charged for a generation: an authenticated user, or a
/// best-effort client IP address for anonymous callers. Exactly one of the
/// two; the quota table enforces the same split.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    User(DbId),
    Ip(String),
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::User(_))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::User(id) => write!(f, "user:{id}"),
            Identity::Ip(addr) => write!(f, "ip:{addr}"),
        }
    }
}
