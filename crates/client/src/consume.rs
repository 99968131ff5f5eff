use futures::{Stream, StreamExt};
use gitscribe_protocol::StreamEvent;

use crate::session::GenerationSession;

/// Shown when the transport fails in a way no typed error describes.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Drive a decoded event stream through a session until it ends.
///
/// This is the one canonical driver: transport errors surface as an
/// `UNKNOWN` failure, terminal events stop consumption, and a stream
/// that simply ends completes the session.
pub async fn consume<S, E>(session: &mut GenerationSession, stream: S)
where
    S: Stream<Item = Result<StreamEvent, E>>,
    E: std::fmt::Display,
{
    let mut stream = std::pin::pin!(stream);
    session.response_started();

    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => {
                let terminal = event.is_terminal();
                session.apply(event);
                if terminal {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "generation stream transport failure");
                session.fail_transport(UNKNOWN_ERROR_MESSAGE);
                return;
            }
        }
    }

    session.finish();
}
