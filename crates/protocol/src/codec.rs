//! Newline-delimited JSON framing for [`StreamEvent`]s.

use crate::event::StreamEvent;

/// Encode one event as a newline-terminated JSON line.
pub fn encode_event(event: &StreamEvent) -> String {
    // StreamEvent contains only string-keyed data, so serialization cannot
    // fail.
    let mut line = serde_json::to_string(event).expect("stream event serializes to JSON");
    line.push('\n');
    line
}

/// Decode a single line into an event.
///
/// Blank lines, malformed JSON, and unrecognized `kind`s all yield `None`;
/// consumers treat them as forward-compatible no-ops.
pub fn decode_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    serde_json::from_str(line).ok()
}

/// Incremental decoder tolerant of arbitrary transport chunking.
///
/// Lines may be split across chunks or arrive several to a chunk; `push`
/// returns every event completed by the chunk, in order. `finish` flushes
/// a final line that arrived without its terminating newline.
#[derive(Debug, Default)]
pub struct EventDecoder {
    buffer: String,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.buffer.push_str(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            if let Some(event) = decode_line(&line) {
                events.push(event);
            }
        }
        events
    }

    pub fn finish(self) -> Option<StreamEvent> {
        decode_line(&self.buffer)
    }
}
