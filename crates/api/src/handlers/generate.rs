//! Handler for the streaming README generation endpoint.
//!
//! The response is `application/x-ndjson`: one JSON-encoded
//! [`StreamEvent`] per line, produced by the generation pipeline on an
//! mpsc channel and forwarded as the body. URL validation happens here,
//! before the stream starts, so a bad URL is an ordinary 400 and costs
//! no quota.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use gitscribe_ai::AttachedFile;
use gitscribe_core::RepoRef;
use gitscribe_protocol::{encode_event, StreamEvent};

use crate::error::AppResult;
use crate::generation::{self, GenerationRequest};
use crate::middleware::OptionalIdentity;
use crate::state::AppState;

/// Backpressure bound between the pipeline and the response body.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Request body for `POST /readmes/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub repo_url: String,
    #[serde(default)]
    pub template_content: String,
    #[serde(default)]
    pub additional_context: String,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

/// A user-uploaded file forwarded into the prompt.
#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    /// MIME type as reported by the uploader.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
}

/// POST /api/v1/readmes/generate
///
/// Validates the repository URL, then spawns the pipeline and streams its
/// events back as NDJSON. Everything after validation, including quota
/// denial, arrives as events in the body of a 200 response.
pub async fn generate(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
    Json(body): Json<GenerateBody>,
) -> AppResult<Response> {
    let repo = RepoRef::parse(&body.repo_url)?;

    let request = GenerationRequest {
        repo,
        template_content: body.template_content,
        additional_context: body.additional_context,
        exclude_patterns: body.exclude_patterns,
        files: body
            .files
            .into_iter()
            .map(|file| AttachedFile {
                name: file.name,
                kind: file.kind,
                content: file.content,
            })
            .collect(),
    };

    let (tx, rx) = mpsc::channel::<StreamEvent>(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(generation::run(state.clone(), identity, request, tx));

    let body = Body::from_stream(
        ReceiverStream::new(rx).map(|event| Ok::<_, Infallible>(encode_event(&event))),
    );

    Ok(([(header::CONTENT_TYPE, "application/x-ndjson")], body).into_response())
}
