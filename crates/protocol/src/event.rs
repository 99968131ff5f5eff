//! Event envelope for the generation stream.

use gitscribe_core::ApiError;
use serde::{Deserialize, Serialize};

/// One unit on the generation stream, in emission order:
/// `packing_complete`, `short_id`, zero or more `content` fragments, then
/// exactly one terminal `error` or `done`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Packing succeeded; the AI call is about to start.
    PackingComplete,
    /// Short id assigned for this generation; the client should adopt it
    /// in its visible URL before content arrives.
    ShortId { short_id: String },
    /// One fragment of generated README text. Fragments are appended in
    /// arrival order, never reordered or deduplicated.
    Content { text: String },
    /// Terminal failure. No further events follow.
    Error { error: ApiError },
    /// Terminal success. Content was already delivered via `Content`
    /// fragments; this carries no payload.
    Done,
}

impl StreamEvent {
    pub fn content(text: impl Into<String>) -> Self {
        StreamEvent::Content { text: text.into() }
    }

    pub fn short_id(short_id: impl Into<String>) -> Self {
        StreamEvent::ShortId {
            short_id: short_id.into(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        StreamEvent::Error { error }
    }

    /// Terminal events end the stream; nothing may follow them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Error { .. } | StreamEvent::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_match_the_wire_names() {
        let json = serde_json::to_value(&StreamEvent::PackingComplete).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "packing_complete"}));

        let json = serde_json::to_value(&StreamEvent::short_id("ab12")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "short_id", "short_id": "ab12"})
        );

        let json = serde_json::to_value(&StreamEvent::content("# Title")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "content", "text": "# Title"}));

        let json = serde_json::to_value(&StreamEvent::Done).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "done"}));
    }

    #[test]
    fn error_event_nests_the_taxonomy() {
        let event = StreamEvent::error(ApiError::repository_not_found());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["error"]["type"], "REPOSITORY_NOT_FOUND");
    }

    #[test]
    fn terminality() {
        assert!(StreamEvent::Done.is_terminal());
        assert!(StreamEvent::error(ApiError::unknown("x")).is_terminal());
        assert!(!StreamEvent::PackingComplete.is_terminal());
        assert!(!StreamEvent::content("x").is_terminal());
        assert!(!StreamEvent::short_id("ab12").is_terminal());
    }
}
