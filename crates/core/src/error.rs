//! The error taxonomy shared between the server and client halves of the
//! generation pipeline.
//!
//! Every failure surfaced to a caller is one of these variants, serialized
//! with a `type` discriminator so clients branch on the kind rather than on
//! message text. Variants carry a human-readable `message` plus whatever
//! structured payload the kind needs (quota snapshot, largest-file list).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fmt::thousands;
use crate::quota::RateLimitInfo;

/// Token ceiling echoed in token-limit messages. Matches the packing
/// service's default budget.
pub const DEFAULT_MAX_TOKENS: u64 = 100_000;

/// One file reported back when packed content exceeds the token budget.
/// The list lets a caller exclude the worst offenders and retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargestFile {
    pub path: String,
    /// The packing service reports this under a `tokens` key; older
    /// deployments sent `size_kb`. Both spellings deserialize here.
    #[serde(alias = "tokens")]
    pub size_kb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(tag = "type")]
pub enum ApiError {
    /// The caller's daily generation quota is spent (or the caller could
    /// not be identified at all).
    #[serde(rename = "RATE_LIMIT")]
    #[error("{message}")]
    RateLimit {
        message: String,
        info: RateLimitInfo,
    },

    /// The packed repository exceeds the token budget.
    #[serde(rename = "TOKEN_LIMIT")]
    #[error("{message}")]
    TokenLimit {
        message: String,
        files_analyzed: u64,
        estimated_tokens: u64,
        largest_files: Vec<LargestFile>,
    },

    #[serde(rename = "UNAUTHORIZED")]
    #[error("{message}")]
    Unauthorized { message: String },

    /// The repository exists but cannot be read (private or forbidden).
    #[serde(rename = "REPOSITORY_ACCESS")]
    #[error("{message}")]
    RepositoryAccess { message: String },

    #[serde(rename = "REPOSITORY_NOT_FOUND")]
    #[error("{message}")]
    RepositoryNotFound { message: String },

    /// Anything that went wrong server-side, optionally annotated with the
    /// upstream HTTP status and opaque details.
    #[serde(rename = "INTERNAL")]
    #[error("{message}")]
    Internal {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<serde_json::Value>,
    },

    /// Transport-level failures the client could not classify.
    #[serde(rename = "UNKNOWN")]
    #[error("{message}")]
    Unknown { message: String },
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

impl ApiError {
    pub fn rate_limit(info: RateLimitInfo, message: impl Into<String>) -> Self {
        ApiError::RateLimit {
            message: message.into(),
            info,
        }
    }

    /// The message embeds the formatted token counts so the dialog can show
    /// them without re-deriving the numbers.
    pub fn token_limit(
        files_analyzed: u64,
        estimated_tokens: u64,
        largest_files: Vec<LargestFile>,
    ) -> Self {
        ApiError::TokenLimit {
            message: format!(
                "The repository content is {} tokens, which exceeds the limit of {} \
                 tokens. Please exclude some files and try again.",
                thousands(estimated_tokens),
                thousands(DEFAULT_MAX_TOKENS)
            ),
            files_analyzed,
            estimated_tokens,
            largest_files,
        }
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized {
            message: "Unauthorized - check your API token".into(),
        }
    }

    pub fn repository_access() -> Self {
        ApiError::RepositoryAccess {
            message: "Cannot access repository. Make sure the repository exists and is public."
                .into(),
        }
    }

    pub fn repository_not_found() -> Self {
        ApiError::RepositoryNotFound {
            message: "Repository not found. Please check the URL and try again.".into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn internal_with_status(message: impl Into<String>, status: u16) -> Self {
        ApiError::Internal {
            message: message.into(),
            status: Some(status),
            details: None,
        }
    }

    pub fn internal_with_details(
        message: impl Into<String>,
        status: u16,
        details: serde_json::Value,
    ) -> Self {
        ApiError::Internal {
            message: message.into(),
            status: Some(status),
            details: Some(details),
        }
    }

    /// The server (or an upstream it depends on) could not be reached.
    pub fn connection() -> Self {
        ApiError::internal(
            "Could not connect to the server. Please check your connection and try again.",
        )
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        ApiError::Unknown {
            message: message.into(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn message(&self) -> &str {
        match self {
            ApiError::RateLimit { message, .. }
            | ApiError::TokenLimit { message, .. }
            | ApiError::Unauthorized { message }
            | ApiError::RepositoryAccess { message }
            | ApiError::RepositoryNotFound { message }
            | ApiError::Internal { message, .. }
            | ApiError::Unknown { message } => message,
        }
    }

    /// The wire discriminator for this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::RateLimit { .. } => "RATE_LIMIT",
            ApiError::TokenLimit { .. } => "TOKEN_LIMIT",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::RepositoryAccess { .. } => "REPOSITORY_ACCESS",
            ApiError::RepositoryNotFound { .. } => "REPOSITORY_NOT_FOUND",
            ApiError::Internal { .. } => "INTERNAL",
            ApiError::Unknown { .. } => "UNKNOWN",
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ApiError::RateLimit { .. })
    }

    pub fn is_token_limit(&self) -> bool {
        matches!(self, ApiError::TokenLimit { .. })
    }
}
