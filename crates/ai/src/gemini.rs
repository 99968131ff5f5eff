//! Gemini REST client with SSE streaming.

use std::time::Duration;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::fence::FenceStripper;
use crate::generator::{GeneratorError, ReadmeGenerator, ReadmeStream};
use crate::prompt::GenerationPrompt;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-001";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// Sampling parameters tuned for documentation: low temperature, wide-ish
// nucleus, generous output budget.
const MAX_OUTPUT_TOKENS: u32 = 8_192;
const TEMPERATURE: f32 = 0.4;
const TOP_P: f32 = 0.8;
const TOP_K: u32 = 40;

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// No total request timeout here: a generation legitimately runs for
    /// minutes, and the caller bounds the whole stream instead.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Point the client at a different endpoint (a proxy, a regional
    /// deployment).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl ReadmeGenerator for GeminiClient {
    fn generate(&self, prompt: GenerationPrompt) -> ReadmeStream {
        let (tx, rx) = mpsc::channel(32);
        let http = self.http.clone();
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        );
        let api_key = self.api_key.clone();

        tokio::spawn(async move {
            if let Err(err) = stream_generation(http, url, api_key, prompt, &tx).await {
                let _ = tx.send(Err(err)).await;
            }
        });

        Box::pin(ReceiverStream::new(rx))
    }
}

async fn stream_generation(
    http: reqwest::Client,
    url: String,
    api_key: String,
    prompt: GenerationPrompt,
    tx: &mpsc::Sender<Result<String, GeneratorError>>,
) -> Result<(), GeneratorError> {
    let rendered = prompt.render();
    let request = GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: &rendered }],
        }],
        generation_config: GenerationConfig::default(),
    };

    tracing::debug!(prompt_bytes = rendered.len(), "starting generation stream");

    let response = http
        .post(&url)
        .header("x-goog-api-key", &api_key)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, "generation request rejected");
        return Err(GeneratorError::Provider {
            status: status.as_u16(),
            body,
        });
    }

    let mut stripper = FenceStripper::new();
    // Raw bytes buffered until a full line arrives; lines are complete
    // UTF-8 even when a network chunk splits a character.
    let mut pending: Vec<u8> = Vec::new();
    let mut bytes = response.bytes_stream();

    while let Some(chunk) = bytes.next().await {
        let chunk = chunk?;
        pending.extend_from_slice(&chunk);

        while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(text) = parse_sse_line(&line)? {
                if let Some(ready) = stripper.push(&text) {
                    if tx.send(Ok(ready)).await.is_err() {
                        // Receiver dropped; the generation is abandoned.
                        return Ok(());
                    }
                }
            }
        }
    }

    if let Some(rest) = stripper.finish() {
        let _ = tx.send(Ok(rest)).await;
    }
    Ok(())
}

/// Decode one SSE line. Non-data lines and end-of-stream sentinels are
/// skipped; data frames yield the first candidate's first text part, if
/// any.
fn parse_sse_line(line: &str) -> Result<Option<String>, GeneratorError> {
    let Some(payload) = line.trim().strip_prefix("data:") else {
        return Ok(None);
    };
    let payload = payload.trim_start();
    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }
    let frame: StreamFrame = serde_json::from_str(payload)?;
    Ok(frame.into_text())
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamFrame {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: Option<String>,
}

impl StreamFrame {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}
