//! Incremental removal of the markdown fence the model wraps its answer in.
//!
//! The prompt instructs the model to start with ```` ```md ```` and end
//! with ```` ``` ````. Neither marker is part of the document, and both can
//! be split across stream fragments, so stripping happens statefully: the
//! head is decided only after a look-ahead window fills (or the stream
//! ends), and a few bytes of tail are withheld until [`FenceStripper::finish`]
//! so a closing fence can be removed no matter how it was chunked.

/// Bytes accumulated before the opening fence is considered complete.
const HEAD_LOOKAHEAD: usize = 100;

/// Longest closing sequence `finish` may need to drop ("```\n").
const TAIL_RESERVE: usize = 4;

#[derive(Debug, Default)]
pub struct FenceStripper {
    buffer: String,
    head_done: bool,
}

impl FenceStripper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one stream fragment. Returns any text that is now safe to
    /// emit, which may be empty while the look-ahead window fills.
    pub fn push(&mut self, fragment: &str) -> Option<String> {
        self.buffer.push_str(fragment);

        if !self.head_done {
            if self.buffer.len() < HEAD_LOOKAHEAD {
                return None;
            }
            self.strip_head();
            self.head_done = true;
        }

        self.drain_ready()
    }

    /// Signal end-of-stream. Strips a trailing fence from the withheld
    /// tail and flushes whatever remains, including everything from
    /// streams too short to ever fill the look-ahead window.
    pub fn finish(mut self) -> Option<String> {
        if !self.head_done {
            self.strip_head();
        }

        let mut end = self.buffer.len();
        if self.buffer.ends_with("```\n") {
            end -= 4;
        } else if self.buffer.ends_with("```") {
            end -= 3;
        }
        self.buffer.truncate(end);

        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer)
        }
    }

    /// Both opening markers the model has been seen to use, each with an
    /// optional trailing newline.
    fn strip_head(&mut self) {
        if let Some(rest) = self.buffer.strip_prefix("<md") {
            let rest = rest.strip_prefix('\n').unwrap_or(rest);
            self.buffer = rest.to_string();
        }
        if let Some(rest) = self.buffer.strip_prefix("```md") {
            let rest = rest.strip_prefix('\n').unwrap_or(rest);
            self.buffer = rest.to_string();
        }
    }

    /// Emit everything except the tail reserve, splitting on a char
    /// boundary so multi-byte text never tears.
    fn drain_ready(&mut self) -> Option<String> {
        if self.buffer.len() <= TAIL_RESERVE {
            return None;
        }
        let mut split = self.buffer.len() - TAIL_RESERVE;
        while !self.buffer.is_char_boundary(split) {
            split -= 1;
        }
        if split == 0 {
            return None;
        }
        let tail = self.buffer.split_off(split);
        let ready = std::mem::replace(&mut self.buffer, tail);
        Some(ready)
    }
}
