//! Streaming README generation.
//!
//! The [`ReadmeGenerator`] trait turns a rendered prompt into a stream of
//! text fragments. [`GeminiClient`] implements it against the Gemini REST
//! API; [`MockGenerator`] replays a canned document for local development.
//! Provider output arrives wrapped in a markdown fence, which
//! [`FenceStripper`] removes incrementally as fragments flow through.

pub mod fence;
pub mod gemini;
pub mod generator;
pub mod mock;
pub mod prompt;

pub use fence::FenceStripper;
pub use gemini::{GeminiClient, DEFAULT_GEMINI_MODEL};
pub use generator::{GeneratorError, ReadmeGenerator, ReadmeStream};
pub use mock::MockGenerator;
pub use prompt::{AttachedFile, GenerationPrompt};
