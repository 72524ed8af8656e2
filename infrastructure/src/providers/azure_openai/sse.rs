//! Incremental decoder for the provider's `text/event-stream` body.
//!
//! Bytes arrive in arbitrary chunks; events are separated by a blank line.
//! Only `data:` fields are consumed. Multi-line data is joined with `\n`.

/// Sentinel sent by OpenAI-compatible providers after the last chunk.
pub(crate) const DONE_SENTINEL: &str = "[DONE]";

/// Buffers partial chunks and yields complete `data` payloads.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. `\r` is dropped so CRLF framing reads as LF.
    pub fn push(&mut self, chunk: &[u8]) {
        self.pending
            .extend(chunk.iter().copied().filter(|&b| b != b'\r'));
    }

    /// Next complete event's data payload, if one is buffered.
    ///
    /// Events without data lines (comments, keep-alives) are skipped.
    pub fn next_data(&mut self) -> Option<String> {
        loop {
            let pos = self.pending.windows(2).position(|w| w == b"\n\n")?;
            let block: Vec<u8> = self.pending.drain(..pos + 2).collect();
            if let Some(data) = parse_block(&block[..pos]) {
                return Some(data);
            }
        }
    }

    /// Data of a trailing event the provider did not terminate.
    pub fn finish(&mut self) -> Option<String> {
        let block = std::mem::take(&mut self.pending);
        parse_block(&block)
    }
}

fn parse_block(block: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(block);
    let data_lines: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .collect();

    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}
