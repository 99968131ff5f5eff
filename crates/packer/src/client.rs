//! HTTP client for the packing service.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use gitscribe_core::{ApiError, LargestFile};
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::request::{PackRequest, PackedRepository};
use crate::Packer;

/// Message for packs the service gave up on.
const TIMEOUT_MESSAGE: &str =
    "The repository is taking too long to process. This usually happens with a poor network \
     connection or a large repository. Try excluding more files or try again later.";

/// Matches the service's own limit description, e.g. "10 per 1 minute".
static RATE_LIMIT_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) per (\d+) (minute|second)").expect("valid regex"));

pub struct PackerClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl PackerClient {
    /// `timeout` bounds the whole pack call. Large repositories take a
    /// while, so callers pass a generous value.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl Packer for PackerClient {
    async fn pack(&self, request: &PackRequest) -> Result<PackedRepository, ApiError> {
        let url = format!("{}/api/pack", self.base_url);
        tracing::debug!(
            repo_url = %request.repo_url,
            max_tokens = request.max_tokens,
            "packing repository"
        );

        let response = match self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "packing service unreachable");
                return Err(ApiError::connection());
            }
        };

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(
                    status = %status,
                    error = %err,
                    "failed to read packing service response"
                );
                return Err(ApiError::connection());
            }
        };

        classify_response(status, retry_after.as_deref(), &body)
    }
}

// ---------------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------------

/// Everything the service might send back, success or failure. All fields
/// optional so one shape covers token-limit bodies, timeout bodies, and
/// successful packs.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireResponse {
    error: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    files_analyzed: Option<f64>,
    estimated_tokens: Option<f64>,
    content: Option<String>,
    largest_files: Option<Vec<LargestFile>>,
}

/// Map a packing service response to a result.
///
/// Status mapping: 401 unauthorized, 403 repository access (unless the
/// body is too short to have come from the service at all), 404 not
/// found, 429 rate limited with the parsed limit text and Retry-After
/// propagated as details, anything else non-2xx a server error that may
/// still carry a structured token-limit or timeout body.
fn classify_response(
    status: StatusCode,
    retry_after: Option<&str>,
    body: &str,
) -> Result<PackedRepository, ApiError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let limit = parse_rate_limit_text(body).unwrap_or("Unknown limit");
        return Err(ApiError::internal_with_details(
            "Rate limit exceeded",
            status.as_u16(),
            serde_json::json!({ "limit": limit, "retry_after": retry_after }),
        ));
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::unauthorized());
    }

    if status == StatusCode::FORBIDDEN {
        // A body this short is a misconfigured proxy or backend rather
        // than the service reporting a private repository.
        if body.len() < 10 {
            return Err(ApiError::connection());
        }
        return Err(ApiError::repository_access());
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::repository_not_found());
    }

    if !status.is_success() {
        if let Ok(wire) = serde_json::from_str::<WireResponse>(body) {
            if let Some(err) = token_limit_error(&wire) {
                return Err(err);
            }
            if wire.kind.as_deref() == Some("AsyncTimeoutError")
                && wire
                    .error
                    .as_deref()
                    .is_some_and(|e| e.contains("Operation timed out"))
            {
                return Err(ApiError::internal_with_status(TIMEOUT_MESSAGE, status.as_u16()));
            }
        }
        return Err(ApiError::internal_with_status(
            format!("Server error ({}): {body}", status.as_u16()),
            status.as_u16(),
        ));
    }

    let wire: WireResponse = match serde_json::from_str(body) {
        Ok(wire) => wire,
        Err(err) => {
            tracing::warn!(error = %err, "packing service returned unparseable JSON");
            return Err(ApiError::internal("Invalid response from server"));
        }
    };

    // A 2xx can still carry an application-level error.
    if let Some(message) = wire.error.clone() {
        if let Some(err) = token_limit_error(&wire) {
            return Err(err);
        }
        return Err(ApiError::internal(message));
    }

    match (wire.files_analyzed, wire.estimated_tokens, wire.content) {
        (Some(files), Some(tokens), Some(content)) => Ok(PackedRepository {
            files_analyzed: files as u64,
            estimated_tokens: tokens as u64,
            content,
        }),
        _ => Err(ApiError::internal("Invalid response from server")),
    }
}

/// The richer failure for packs rejected over the token budget. Carries
/// the largest offending files so a caller can exclude them and retry.
fn token_limit_error(wire: &WireResponse) -> Option<ApiError> {
    if wire.error.as_deref() != Some("Token limit exceeded") {
        return None;
    }
    Some(ApiError::token_limit(
        wire.files_analyzed? as u64,
        wire.estimated_tokens? as u64,
        wire.largest_files.clone()?,
    ))
}

fn parse_rate_limit_text(body: &str) -> Option<&str> {
    RATE_LIMIT_TEXT_RE.find(body).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_token_hint() {
        let err = classify_response(StatusCode::UNAUTHORIZED, None, "").unwrap_err();
        assert_eq!(err.kind(), "UNAUTHORIZED");
        assert_eq!(err.message(), "Unauthorized - check your API token");
    }

    #[test]
    fn forbidden_with_real_body_is_repository_access() {
        let err = classify_response(
            StatusCode::FORBIDDEN,
            None,
            r#"{"error": "Repository is private"}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "REPOSITORY_ACCESS");
    }

    #[test]
    fn forbidden_with_short_body_is_a_connection_problem() {
        let err = classify_response(StatusCode::FORBIDDEN, None, "").unwrap_err();
        assert_eq!(err.kind(), "INTERNAL");
        assert!(err.message().contains("Could not connect"));
    }

    #[test]
    fn not_found_maps_to_repository_not_found() {
        let err = classify_response(StatusCode::NOT_FOUND, None, "nope").unwrap_err();
        assert_eq!(err.kind(), "REPOSITORY_NOT_FOUND");
    }

    #[test]
    fn rate_limited_carries_limit_text_and_retry_after() {
        let err = classify_response(
            StatusCode::TOO_MANY_REQUESTS,
            Some("30"),
            "429 Too Many Requests: 10 per 1 minute",
        )
        .unwrap_err();

        match err {
            ApiError::Internal {
                message,
                status,
                details,
            } => {
                assert_eq!(message, "Rate limit exceeded");
                assert_eq!(status, Some(429));
                let details = details.unwrap();
                assert_eq!(details["limit"], "10 per 1 minute");
                assert_eq!(details["retry_after"], "30");
            }
            other => panic!("expected internal error, got {other:?}"),
        }
    }

    #[test]
    fn rate_limited_without_parseable_text_reports_unknown_limit() {
        let err =
            classify_response(StatusCode::TOO_MANY_REQUESTS, None, "slow down").unwrap_err();
        match err {
            ApiError::Internal { details, .. } => {
                assert_eq!(details.unwrap()["limit"], "Unknown limit");
            }
            other => panic!("expected internal error, got {other:?}"),
        }
    }

    #[test]
    fn token_limit_body_becomes_the_richer_error() {
        let body = r#"{
            "error": "Token limit exceeded",
            "files_analyzed": 321,
            "estimated_tokens": 245812.0,
            "largest_files": [
                {"path": "vendor/bundle.js", "tokens": 90210},
                {"path": "data/fixtures.json", "tokens": 48000}
            ]
        }"#;
        let err = classify_response(StatusCode::BAD_REQUEST, None, body).unwrap_err();

        match err {
            ApiError::TokenLimit {
                message,
                files_analyzed,
                estimated_tokens,
                largest_files,
            } => {
                assert_eq!(files_analyzed, 321);
                assert_eq!(estimated_tokens, 245_812);
                assert_eq!(largest_files.len(), 2);
                assert_eq!(largest_files[0].path, "vendor/bundle.js");
                assert!(message.contains("245,812"));
            }
            other => panic!("expected token limit error, got {other:?}"),
        }
    }

    #[test]
    fn token_limit_on_a_2xx_is_still_detected() {
        let body = r#"{
            "error": "Token limit exceeded",
            "files_analyzed": 10,
            "estimated_tokens": 120000,
            "largest_files": []
        }"#;
        let err = classify_response(StatusCode::OK, None, body).unwrap_err();
        assert!(err.is_token_limit());
    }

    #[test]
    fn async_timeout_body_gets_the_friendly_message() {
        let body = r#"{"type": "AsyncTimeoutError", "error": "Operation timed out after 120s"}"#;
        let err = classify_response(StatusCode::GATEWAY_TIMEOUT, None, body).unwrap_err();
        assert!(err.message().contains("taking too long to process"));
    }

    #[test]
    fn other_failures_echo_status_and_body() {
        let err =
            classify_response(StatusCode::INTERNAL_SERVER_ERROR, None, "boom").unwrap_err();
        assert_eq!(err.message(), "Server error (500): boom");
    }

    #[test]
    fn successful_pack_parses() {
        let body = r#"{
            "files_analyzed": 42,
            "estimated_tokens": 9001.5,
            "content": "Repository digest"
        }"#;
        let packed = classify_response(StatusCode::OK, None, body).unwrap();
        assert_eq!(packed.files_analyzed, 42);
        assert_eq!(packed.estimated_tokens, 9001);
        assert_eq!(packed.content, "Repository digest");
    }

    #[test]
    fn plain_error_field_on_2xx_is_internal() {
        let err =
            classify_response(StatusCode::OK, None, r#"{"error": "clone failed"}"#).unwrap_err();
        assert_eq!(err.kind(), "INTERNAL");
        assert_eq!(err.message(), "clone failed");
    }

    #[test]
    fn unparseable_2xx_is_invalid_response() {
        let err = classify_response(StatusCode::OK, None, "<html>oops</html>").unwrap_err();
        assert_eq!(err.message(), "Invalid response from server");
    }

    #[test]
    fn limit_text_parsing() {
        assert_eq!(
            parse_rate_limit_text("Rate limit: 10 per 1 minute for this key"),
            Some("10 per 1 minute")
        );
        assert_eq!(
            parse_rate_limit_text("5 per 30 second"),
            Some("5 per 30 second")
        );
        assert_eq!(parse_rate_limit_text("try later"), None);
    }
}
