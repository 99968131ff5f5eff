//! Canned packer for local development and tests.

use async_trait::async_trait;
use gitscribe_core::ApiError;

use crate::request::{PackRequest, PackedRepository};
use crate::Packer;

/// Returns a fixed digest without touching the network.
#[derive(Debug, Clone, Default)]
pub struct MockPacker;

#[async_trait]
impl Packer for MockPacker {
    async fn pack(&self, request: &PackRequest) -> Result<PackedRepository, ApiError> {
        tracing::debug!(repo_url = %request.repo_url, "serving mock pack");
        Ok(PackedRepository {
            files_analyzed: 12,
            estimated_tokens: 4_200,
            content: format!(
                "Directory structure:\n  src/\n    main.rs\n    lib.rs\n  README.md\n\n\
                 Repository: {}\n\nfn main() {{ println!(\"hello\"); }}\n",
                request.repo_url
            ),
        })
    }
}
