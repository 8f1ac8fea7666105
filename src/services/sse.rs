//! Incremental server-sent-events decoder for `/chat/stream`.
//!
//! ```text
//! data: {"token": "Mer"}
//!
//! data: {"token": "haba"}
//!
//! data: [DONE]
//! ```
//!
//! Chunks are buffered as bytes and split on `\n` before decoding, so a
//! multi-byte character cut across two chunks survives intact.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event_type: Option<String>,
    /// `data:` lines joined with `\n`.
    pub data: String,
}

impl SseEvent {
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }
}

/// What a `/chat/stream` event means to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    Token(String),
    Done,
    Error(String),
    /// Keep-alives, empty tokens, unknown payloads.
    Ignored,
}

#[derive(Deserialize)]
struct FramePayload {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl From<&SseEvent> for StreamFrame {
    fn from(event: &SseEvent) -> Self {
        if event.is_done() {
            return StreamFrame::Done;
        }
        match serde_json::from_str::<FramePayload>(&event.data) {
            Ok(FramePayload { error: Some(error), .. }) => StreamFrame::Error(error),
            Ok(FramePayload { token: Some(token), .. }) if !token.is_empty() => {
                StreamFrame::Token(token)
            }
            Ok(_) => StreamFrame::Ignored,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable stream frame skipped");
                StreamFrame::Ignored
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    event_type: Option<String>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk; returns the events it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.pending.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(event) = self.line(line) {
                events.push(event);
            }
        }
        events
    }

    /// Flushes an event left open when the stream ended without a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if !self.pending.is_empty() {
            let raw = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&raw).into_owned();
            if let Some(event) = self.line(line.strip_suffix('\r').unwrap_or(&line)) {
                return Some(event);
            }
        }
        self.take_event()
    }

    fn line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.take_event();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.data_lines.push(value.to_string()),
            "event" => self.event_type = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        if self.data_lines.is_empty() {
            self.event_type = None;
            return None;
        }
        Some(SseEvent {
            event_type: self.event_type.take(),
            data: std::mem::take(&mut self.data_lines).join("\n"),
        })
    }
}
