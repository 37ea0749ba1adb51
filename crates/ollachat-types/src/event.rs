use serde::{Deserialize, Serialize};

/// End-of-stream marker payload.
pub const DONE_MARKER: &str = "[DONE]";

/// Fully framed terminal sentinel as it appears on the wire.
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// A normalized event on the relay-to-client stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// A chunk of assistant text to append.
    Text { content: String },
    /// Terminal sentinel; no further events will arrive.
    Done,
}

/// Encode an event as a `data: ...\n\n` frame.
pub fn encode_frame(event: &StreamEvent) -> String {
    match event {
        StreamEvent::Done => DONE_FRAME.to_string(),
        StreamEvent::Text { .. } => {
            // Serialization of a text event cannot fail.
            let json = serde_json::to_string(event).unwrap_or_default();
            format!("data: {}\n\n", json)
        }
    }
}

/// Decode one client-side line into an event.
///
/// Lenient by contract: anything that is not a well-formed `data: ` frame
/// (missing prefix, malformed JSON, unknown event shape) yields `None` and
/// the caller moves on to the next line.
pub fn decode_frame(line: &str) -> Option<StreamEvent> {
    let data = line.trim().strip_prefix("data: ")?;
    if data.trim() == DONE_MARKER {
        return Some(StreamEvent::Done);
    }
    serde_json::from_str(data).ok()
}

/// Decode one upstream NDJSON line from the generate endpoint.
///
/// Yields the `response` field when the line parses and carries one; malformed
/// lines and lines without a `response` are skipped by returning `None`.
pub fn decode_generate_line(line: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct GenerateLine {
        response: Option<String>,
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str::<GenerateLine>(trimmed)
        .ok()
        .and_then(|l| l.response)
}
