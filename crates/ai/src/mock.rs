//! Canned generator for local development and tests.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::generator::{ReadmeGenerator, ReadmeStream};
use crate::prompt::GenerationPrompt;

const MOCK_DELAY: Duration = Duration::from_millis(300);
const MOCK_CHUNK_CHARS: usize = 100;

/// The document replayed by [`MockGenerator`]. Unfenced on purpose: the
/// mock stands in for output that has already been through fence
/// stripping.
pub const EXAMPLE_README: &str = r#"<div align="center">

<img src="https://github.com/user-attachments/assets/0ae1b6d5-1a62-4b41-b2c7-c595a0460497" alt="logo" width="120" />

# widget

A small tool that does one thing well.

</div>

## Features

- Fast startup with zero configuration
- Streams results as they are produced
- Works the same on Linux, macOS, and Windows

## Installation

```bash
cargo install widget
```

## Usage

```bash
widget run --input data.csv
```

The first run creates a config file at `~/.config/widget/config.toml`.
Edit it to change the output directory or the concurrency level.

## How it works

widget reads its input in fixed-size batches, fans each batch out to a
worker pool, and merges results in arrival order. Failures in one batch
never block the others; they are reported at the end with enough context
to retry just the failed rows.

## Contributing

Bug reports and pull requests are welcome. For larger changes, open an
issue first so the approach can be discussed.

## License

MIT
"#;

/// Replays [`EXAMPLE_README`] in fixed-size slices after a short delay,
/// roughly the shape of real provider output. No network involved.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    delay: Duration,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self { delay: MOCK_DELAY }
    }

    /// Tests that drive a full pipeline use a zero delay.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadmeGenerator for MockGenerator {
    fn generate(&self, _prompt: GenerationPrompt) -> ReadmeStream {
        let delay = self.delay;
        let (tx, rx) = mpsc::channel(8);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            for slice in char_slices(EXAMPLE_README, MOCK_CHUNK_CHARS) {
                if tx.send(Ok(slice)).await.is_err() {
                    return;
                }
            }
        });

        Box::pin(ReceiverStream::new(rx))
    }
}

/// Slice on char boundaries so multi-byte text never tears mid-fragment.
fn char_slices(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}
