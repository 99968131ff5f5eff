//! Client-side view of a running generation.
//!
//! [`GenerationSession`] holds everything a UI needs to render one
//! generation attempt: the current [`GenerationPhase`], the accumulated
//! document, the short id once allocated, and any terminal error. The
//! [`consume`] helper drives a decoded event stream through a session.

pub mod consume;
pub mod phase;
pub mod session;

pub use consume::{consume, UNKNOWN_ERROR_MESSAGE};
pub use phase::GenerationPhase;
pub use session::{AlreadyInFlight, GenerationSession};
