//! Request extractors for caller identity.
//!
//! - [`identity`] -- best-effort and required identity resolution from JWT
//!   Bearer tokens and proxy headers.

pub mod identity;

pub use identity::{OptionalIdentity, RequireUser};
