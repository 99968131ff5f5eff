//! Client for the external repository packing service.
//!
//! Packing turns a GitHub repository into one concatenated, size-bounded
//! text blob for LLM ingestion. The service's HTTP failure modes map to
//! distinct, user-actionable [`gitscribe_core::ApiError`] variants rather
//! than one generic failure.

pub mod client;
pub mod mock;
pub mod request;

use async_trait::async_trait;
use gitscribe_core::ApiError;

pub use client::PackerClient;
pub use mock::MockPacker;
pub use request::{PackRequest, PackedRepository};

/// Converts a repository into packed text. Implemented by the HTTP client
/// and by [`MockPacker`] for offline operation.
#[async_trait]
pub trait Packer: Send + Sync {
    async fn pack(&self, request: &PackRequest) -> Result<PackedRepository, ApiError>;
}
