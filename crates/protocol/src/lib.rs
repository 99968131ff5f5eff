//! The generation wire protocol.
//!
//! A generation request is answered with a single long-lived response body
//! carrying newline-delimited JSON events. Each line is one [`StreamEvent`]
//! with an explicit `kind` discriminator, so content text can never be
//! mistaken for framing. The decoder tolerates arbitrary transport
//! chunking and skips lines it does not understand.

pub mod codec;
pub mod event;

pub use codec::{decode_line, encode_event, EventDecoder};
pub use event::StreamEvent;
