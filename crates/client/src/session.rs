use gitscribe_core::ApiError;
use gitscribe_protocol::StreamEvent;
use thiserror::Error;

use crate::phase::GenerationPhase;

/// Returned by [`GenerationSession::begin`] while a generation is
/// running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a generation is already in flight")]
pub struct AlreadyInFlight;

/// State for one generation attempt as seen from the client.
///
/// The content buffer is append-only and fragments land in arrival
/// order; nothing here reorders or deduplicates. Every terminal outcome,
/// success or failure, lands in [`GenerationPhase::Completed`] so the UI
/// is never stuck on a loading state.
#[derive(Debug, Default)]
pub struct GenerationSession {
    phase: GenerationPhase,
    content: String,
    short_id: Option<String>,
    error: Option<ApiError>,
    error_dialog_open: bool,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attempt. Rejects a double-submit while one is in
    /// flight; otherwise discards all prior attempt state before the
    /// first new byte can arrive.
    pub fn begin(&mut self) -> Result<(), AlreadyInFlight> {
        if self.phase.in_flight() {
            return Err(AlreadyInFlight);
        }
        *self = Self::new();
        self.phase = GenerationPhase::ContactingServer;
        Ok(())
    }

    /// The first byte of the response arrived; the server is packing.
    pub fn response_started(&mut self) {
        self.advance_to(GenerationPhase::PackingRepository);
    }

    /// Fold one decoded event into the session.
    pub fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::PackingComplete => self.advance_to(GenerationPhase::WaitingForAi),
            StreamEvent::ShortId { short_id } => self.short_id = Some(short_id),
            StreamEvent::Content { text } => {
                self.advance_to(GenerationPhase::Streaming);
                self.content.push_str(&text);
            }
            StreamEvent::Error { error } => self.fail(error),
            StreamEvent::Done => self.advance_to(GenerationPhase::Completed),
        }
    }

    /// The transport stream ended. Without a recorded error that counts
    /// as success even if no `done` event was seen.
    pub fn finish(&mut self) {
        self.advance_to(GenerationPhase::Completed);
    }

    /// The transport itself failed (disconnect, decode breakdown).
    pub fn fail_transport(&mut self, message: impl Into<String>) {
        self.fail(ApiError::unknown(message));
    }

    /// Discard everything and return to [`GenerationPhase::NotStarted`].
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn close_error_dialog(&mut self) {
        self.error_dialog_open = false;
    }

    fn fail(&mut self, error: ApiError) {
        self.error = Some(error);
        self.error_dialog_open = true;
        self.phase = GenerationPhase::Completed;
    }

    fn advance_to(&mut self, target: GenerationPhase) {
        if target > self.phase {
            self.phase = target;
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn short_id(&self) -> Option<&str> {
        self.short_id.as_deref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn error_dialog_open(&self) -> bool {
        self.error_dialog_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitscribe_core::{Identity, QuotaLimits, RateLimitInfo};

    #[test]
    fn begin_rejects_double_submit() {
        let mut session = GenerationSession::new();
        session.begin().unwrap();
        assert_eq!(session.begin(), Err(AlreadyInFlight));

        session.finish();
        assert!(session.begin().is_ok());
    }

    #[test]
    fn begin_discards_prior_attempt_state() {
        let mut session = GenerationSession::new();
        session.begin().unwrap();
        session.apply(StreamEvent::ShortId {
            short_id: "ab12".into(),
        });
        session.apply(StreamEvent::Content {
            text: "old attempt".into(),
        });
        session.apply(StreamEvent::Error {
            error: ApiError::repository_not_found(),
        });

        session.begin().unwrap();
        assert_eq!(session.phase(), GenerationPhase::ContactingServer);
        assert_eq!(session.content(), "");
        assert!(session.short_id().is_none());
        assert!(session.error().is_none());
        assert!(!session.error_dialog_open());
    }

    #[test]
    fn phase_never_moves_backwards() {
        let mut session = GenerationSession::new();
        session.begin().unwrap();
        session.apply(StreamEvent::Content {
            text: "early".into(),
        });
        assert_eq!(session.phase(), GenerationPhase::Streaming);

        // A late packing notification must not regress the phase.
        session.apply(StreamEvent::PackingComplete);
        assert_eq!(session.phase(), GenerationPhase::Streaming);
    }

    #[test]
    fn content_appends_in_arrival_order() {
        let mut session = GenerationSession::new();
        session.begin().unwrap();
        session.apply(StreamEvent::Content {
            text: "Hello ".into(),
        });
        session.apply(StreamEvent::Content {
            text: "world".into(),
        });
        assert_eq!(session.content(), "Hello world");
    }

    #[test]
    fn error_event_is_terminal_and_opens_the_dialog() {
        let limits = QuotaLimits::default();
        let info = RateLimitInfo::depleted(limits.anonymous);
        let message = limits.exhausted_message(&Identity::Ip("203.0.113.9".into()));

        let mut session = GenerationSession::new();
        session.begin().unwrap();
        session.apply(StreamEvent::Error {
            error: ApiError::rate_limit(info, message),
        });

        assert_eq!(session.phase(), GenerationPhase::Completed);
        assert!(session.error_dialog_open());
        assert!(session.error().unwrap().is_rate_limit());

        session.close_error_dialog();
        assert!(!session.error_dialog_open());
        assert!(session.error().is_some(), "closing the dialog keeps the error");
    }

    #[test]
    fn reset_returns_to_not_started() {
        let mut session = GenerationSession::new();
        session.begin().unwrap();
        session.apply(StreamEvent::Content { text: "x".into() });
        session.reset();
        assert_eq!(session.phase(), GenerationPhase::NotStarted);
        assert_eq!(session.content(), "");
    }
}
