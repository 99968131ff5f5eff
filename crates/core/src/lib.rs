//! Domain types shared by every other crate in the workspace.
//!
//! This crate performs no I/O. It holds the error taxonomy surfaced to
//! clients, quota bookkeeping types, caller identity, GitHub repository
//! reference parsing, and short-id generation.

pub mod error;
pub mod fmt;
pub mod identity;
pub mod quota;
pub mod repo_url;
pub mod short_id;
pub mod types;

pub use error::{ApiError, LargestFile};
pub use identity::Identity;
pub use quota::{ChargeOutcome, QuotaLimits, RateLimitInfo};
pub use repo_url::{RepoRef, RepoUrlError};
