//! The server half of the generation pipeline.
//!
//! - [`rate_limit`] -- daily quota checks for optionally-identified callers.
//! - [`charge`] -- refund-once bookkeeping for a charged attempt.
//! - [`orchestrator`] -- the pipeline itself: charge, pack, stream, persist.

pub mod charge;
pub mod orchestrator;
pub mod rate_limit;

pub use charge::Charge;
pub use orchestrator::{run, GenerationRequest};
pub use rate_limit::RateLimiter;
