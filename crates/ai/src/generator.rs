use futures::stream::BoxStream;
use thiserror::Error;

use crate::prompt::GenerationPrompt;

/// Fragments of generated README text, in arrival order.
pub type ReadmeStream = BoxStream<'static, Result<String, GeneratorError>>;

#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The provider could not be reached or dropped the connection.
    #[error("text generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("text generation service returned {status}: {body}")]
    Provider { status: u16, body: String },

    /// A stream frame that did not decode.
    #[error("malformed stream frame: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A provider that turns a prompt into streamed README text.
///
/// The stream is lazy and forward-only. Callers that need the full
/// document accumulate fragments themselves; there is no way to rewind
/// or restart a stream.
pub trait ReadmeGenerator: Send + Sync {
    fn generate(&self, prompt: GenerationPrompt) -> ReadmeStream;
}
