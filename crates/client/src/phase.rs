use serde::Serialize;

/// UI-visible stages of one generation attempt, in order.
///
/// Transitions only ever move forward; going back requires an explicit
/// [`reset`](crate::GenerationSession::reset) or
/// [`begin`](crate::GenerationSession::begin). The derived ordering is
/// what enforces that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationPhase {
    #[default]
    NotStarted,
    ContactingServer,
    PackingRepository,
    WaitingForAi,
    Streaming,
    Completed,
}

impl GenerationPhase {
    /// True from submission until the terminal phase. Both endpoints
    /// accept a fresh submission.
    pub fn in_flight(&self) -> bool {
        !matches!(
            self,
            GenerationPhase::NotStarted | GenerationPhase::Completed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_order_by_progress() {
        assert!(GenerationPhase::NotStarted < GenerationPhase::ContactingServer);
        assert!(GenerationPhase::PackingRepository < GenerationPhase::WaitingForAi);
        assert!(GenerationPhase::Streaming < GenerationPhase::Completed);
    }

    #[test]
    fn in_flight_excludes_both_endpoints() {
        assert!(!GenerationPhase::NotStarted.in_flight());
        assert!(GenerationPhase::ContactingServer.in_flight());
        assert!(GenerationPhase::Streaming.in_flight());
        assert!(!GenerationPhase::Completed.in_flight());
    }

    #[test]
    fn serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_value(GenerationPhase::WaitingForAi).unwrap(),
            "WAITING_FOR_AI"
        );
    }
}
