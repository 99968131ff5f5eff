//! Request and response shapes for the packing service.

use serde::{Deserialize, Serialize};

/// Default per-file size cap, in bytes (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10_485_760;

/// Default token budget for the packed output.
pub const DEFAULT_MAX_TOKENS: u64 = 100_000;

/// Body POSTed to the packing service.
#[derive(Debug, Clone, Serialize)]
pub struct PackRequest {
    pub repo_url: String,
    pub max_file_size: u64,
    pub max_tokens: u64,
    pub exclude_patterns: Vec<String>,
}

impl PackRequest {
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_tokens: DEFAULT_MAX_TOKENS,
            exclude_patterns: Vec::new(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_exclude_patterns(mut self, exclude_patterns: Vec<String>) -> Self {
        self.exclude_patterns = exclude_patterns;
        self
    }
}

/// Successful packing result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackedRepository {
    pub files_analyzed: u64,
    pub estimated_tokens: u64,
    pub content: String,
}
