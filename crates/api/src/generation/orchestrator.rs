//! The generation pipeline: one validated request in, an ordered event
//! stream out.
//!
//! Event order is fixed: `packing_complete`, `short_id`, zero or more
//! `content` fragments, then exactly one terminal `error` or `done`. The
//! quota is charged before any expensive work and credited back on every
//! failure after the charge; a client that disconnects mid-stream keeps
//! its charge, since the packing and AI work was already spent.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;

use gitscribe_ai::{AttachedFile, GenerationPrompt, ReadmeGenerator};
use gitscribe_core::{ApiError, ChargeOutcome, Identity, RepoRef};
use gitscribe_db::models::generated_readme::CreateGeneratedReadme;
use gitscribe_db::store::{allocate_unique_short_id, ReadmeStore};
use gitscribe_packer::{PackRequest, Packer};
use gitscribe_protocol::StreamEvent;

use crate::generation::charge::Charge;
use crate::generation::rate_limit::RateLimiter;
use crate::state::AppState;

const STORE_FAILURE_MESSAGE: &str = "An internal error occurred. Please try again later.";
const PACK_TIMEOUT_MESSAGE: &str =
    "Repository packing timed out. Please try again later.";
const GENERATION_FAILED_MESSAGE: &str =
    "README generation failed. Please try again later.";
const GENERATION_TIMEOUT_MESSAGE: &str = "Generation timed out. Please try again later.";
const SAVE_FAILED_MESSAGE: &str =
    "Failed to save the generated README. Please try again later.";

/// Everything the pipeline needs from the HTTP request, already validated.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub repo: RepoRef,
    pub template_content: String,
    pub additional_context: String,
    pub exclude_patterns: Vec<String>,
    pub files: Vec<AttachedFile>,
}

/// Run one generation, emitting events on `tx` until a terminal event.
///
/// Send failures mean the receiver (the HTTP response body) is gone; the
/// pipeline stops quietly and, once past the packing step, keeps the
/// charge.
pub async fn run(
    state: AppState,
    identity: Option<Identity>,
    request: GenerationRequest,
    tx: mpsc::Sender<StreamEvent>,
) {
    let repo_path = request.repo.path();
    tracing::info!(repo = %repo_path, "starting generation");

    // Charge the quota before any expensive work.
    let limiter = RateLimiter::new(state.quota.clone(), state.config.limits());
    let info = match limiter.charge(identity.as_ref()).await {
        Ok(ChargeOutcome::Charged(info)) => info,
        Ok(ChargeOutcome::Denied(err)) => {
            tracing::info!(repo = %repo_path, "generation denied: {}", err.message());
            let _ = tx.send(StreamEvent::error(err)).await;
            return;
        }
        Err(err) => {
            tracing::error!(error = %err, "quota charge failed");
            let _ = tx
                .send(StreamEvent::error(ApiError::internal(STORE_FAILURE_MESSAGE)))
                .await;
            return;
        }
    };

    // Unresolved callers are denied above, so an identity is present here.
    let Some(identity) = identity else { return };
    let mut charge = Charge::new(state.quota.clone(), identity.clone(), info);
    tracing::debug!(
        identity = %identity,
        remaining = charge.info().remaining,
        "quota charged"
    );

    let short_id = match allocate_unique_short_id(state.readmes.as_ref(), &repo_path).await {
        Ok(short_id) => short_id,
        Err(err) => {
            tracing::error!(error = %err, "short id allocation failed");
            charge.refund().await;
            let _ = tx
                .send(StreamEvent::error(ApiError::internal(STORE_FAILURE_MESSAGE)))
                .await;
            return;
        }
    };

    // Pack the repository, bounded by the configured timeout.
    let pack_request = PackRequest::new(request.repo.url())
        .with_max_tokens(state.config.max_repo_tokens)
        .with_exclude_patterns(request.exclude_patterns);
    let pack_timeout = Duration::from_secs(state.config.packer_timeout_secs);

    let packed = match tokio::time::timeout(pack_timeout, state.packer.pack(&pack_request)).await
    {
        Ok(Ok(packed)) => packed,
        Ok(Err(err)) => {
            tracing::warn!(repo = %repo_path, kind = err.kind(), "packing failed: {}", err.message());
            charge.refund().await;
            let _ = tx.send(StreamEvent::error(err)).await;
            return;
        }
        Err(_) => {
            tracing::warn!(
                repo = %repo_path,
                timeout_secs = state.config.packer_timeout_secs,
                "packing timed out"
            );
            charge.refund().await;
            let _ = tx
                .send(StreamEvent::error(ApiError::internal(PACK_TIMEOUT_MESSAGE)))
                .await;
            return;
        }
    };
    tracing::info!(
        repo = %repo_path,
        files = packed.files_analyzed,
        tokens = packed.estimated_tokens,
        "repository packed"
    );

    if tx.send(StreamEvent::PackingComplete).await.is_err()
        || tx.send(StreamEvent::short_id(&short_id)).await.is_err()
    {
        tracing::info!(repo = %repo_path, "client disconnected before streaming");
        return;
    }

    // Stream AI output, relaying fragments as they arrive. The whole
    // stream shares one deadline.
    let prompt = GenerationPrompt::new(packed.content, request.repo.url())
        .with_template(request.template_content)
        .with_additional_context(request.additional_context)
        .with_files(request.files);
    let generation_timeout = Duration::from_secs(state.config.generation_timeout_secs);

    let outcome = match tokio::time::timeout(
        generation_timeout,
        relay_fragments(state.generator.as_ref(), prompt, &tx),
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(
                repo = %repo_path,
                timeout_secs = state.config.generation_timeout_secs,
                "generation timed out"
            );
            charge.refund().await;
            let _ = tx
                .send(StreamEvent::error(ApiError::internal(
                    GENERATION_TIMEOUT_MESSAGE,
                )))
                .await;
            return;
        }
    };

    let content = match outcome {
        RelayOutcome::Completed(content) => content,
        RelayOutcome::Failed(err) => {
            charge.refund().await;
            let _ = tx.send(StreamEvent::error(err)).await;
            return;
        }
        RelayOutcome::Disconnected => {
            tracing::info!(repo = %repo_path, "client disconnected mid-stream");
            return;
        }
    };

    // Persist the full document. Always a fresh row; regenerating the same
    // repository yields a new short id rather than replacing history.
    let create = CreateGeneratedReadme {
        repo_path: repo_path.clone(),
        short_id: short_id.clone(),
        content,
        user_id: match &identity {
            Identity::User(id) => Some(*id),
            Identity::Ip(_) => None,
        },
    };
    let inserted = match state.readmes.insert(&create).await {
        Ok(inserted) => inserted,
        Err(err) => {
            tracing::error!(error = %err, "failed to persist generated readme");
            charge.refund().await;
            let _ = tx
                .send(StreamEvent::error(ApiError::internal(SAVE_FAILED_MESSAGE)))
                .await;
            return;
        }
    };

    tracing::info!(
        repo = %repo_path,
        short_id = %inserted.short_id,
        id = inserted.id,
        "generation complete"
    );
    let _ = tx.send(StreamEvent::Done).await;
}

enum RelayOutcome {
    /// The generator stream ended; carries the accumulated document.
    Completed(String),
    Failed(ApiError),
    /// The receiver dropped mid-stream.
    Disconnected,
}

async fn relay_fragments(
    generator: &dyn ReadmeGenerator,
    prompt: GenerationPrompt,
    tx: &mpsc::Sender<StreamEvent>,
) -> RelayOutcome {
    let mut stream = generator.generate(prompt);
    let mut content = String::new();

    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => {
                content.push_str(&fragment);
                if tx.send(StreamEvent::content(fragment)).await.is_err() {
                    return RelayOutcome::Disconnected;
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "generator stream failed");
                return RelayOutcome::Failed(ApiError::internal(GENERATION_FAILED_MESSAGE));
            }
        }
    }

    RelayOutcome::Completed(content)
}
