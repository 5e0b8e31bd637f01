//! Server-Sent Events framing and provider payload decoding.

use serde_json::Value;
use tracing::{trace, warn};

use super::client::LlmProvider;

/// One dispatched SSE event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseEvent {
    /// The `event:` field, if the server sent one.
    pub event: Option<String>,
    /// All `data:` lines, joined with `\n`.
    pub data: String,
}

/// Incremental SSE parser.
///
/// Bytes are buffered until a full line is available, so chunk
/// boundaries may fall anywhere, including inside a UTF-8 sequence.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(event) = self.feed_line(line) {
                events.push(event);
            }
        }

        events
    }

    /// Dispatches whatever is pending once the stream has ended.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw).trim_end_matches('\r').to_string();
            if let Some(event) = self.feed_line(&line) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => trace!(field, "Ignoring SSE field"),
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() {
            self.event = None;
            return None;
        }
        Some(SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data).join("\n"),
        })
    }
}

/// What a provider's SSE event means for the current turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// A reply fragment. `None` when the event carries no text.
    Fragment(Option<String>),
    /// The reply is complete.
    Done,
    /// The provider reported a failure.
    Failed(String),
    /// Bookkeeping event with no bearing on the reply.
    Skip,
}

/// Interprets one SSE event according to the provider's streaming format.
pub fn decode_chunk(provider: LlmProvider, event: &SseEvent) -> StreamChunk {
    match provider {
        LlmProvider::OpenAI => decode_openai(event),
        LlmProvider::Anthropic => decode_anthropic(event),
    }
}

fn parse(data: &str) -> Result<Value, StreamChunk> {
    serde_json::from_str(data).map_err(|e| {
        warn!(error = %e, data, "Unparseable stream payload");
        StreamChunk::Failed(format!("Failed to parse stream payload: {}", e))
    })
}

fn decode_openai(event: &SseEvent) -> StreamChunk {
    if event.data.trim() == "[DONE]" {
        return StreamChunk::Done;
    }
    let json = match parse(&event.data) {
        Ok(json) => json,
        Err(chunk) => return chunk,
    };
    if let Some(message) = json["error"]["message"].as_str() {
        return StreamChunk::Failed(message.to_string());
    }
    let content = json["choices"][0]["delta"]["content"]
        .as_str()
        .map(str::to_string);
    StreamChunk::Fragment(content)
}

fn decode_anthropic(event: &SseEvent) -> StreamChunk {
    let json = match parse(&event.data) {
        Ok(json) => json,
        Err(chunk) => return chunk,
    };
    let kind = json["type"]
        .as_str()
        .or(event.event.as_deref())
        .unwrap_or_default();
    match kind {
        "content_block_delta" => {
            StreamChunk::Fragment(json["delta"]["text"].as_str().map(str::to_string))
        }
        "message_stop" => StreamChunk::Done,
        "error" => StreamChunk::Failed(
            json["error"]["message"]
                .as_str()
                .unwrap_or("Anthropic stream error")
                .to_string(),
        ),
        _ => StreamChunk::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_handles_split_lines() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        assert!(decoder.push(b": 1}\r\n").is_empty());
        let events = decoder.push(b"\r\n");
        assert_eq!(
            events,
            vec![SseEvent {
                event: None,
                data: "{\"a\": 1}".to_string()
            }]
        );
    }

    #[test]
    fn test_decoder_keeps_event_name_and_multiline_data() {
        let mut decoder = SseDecoder::new();
        let events =
            decoder.push(b": keep-alive\nevent: message_stop\ndata: one\ndata: two\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.as_deref(), Some("message_stop"));
        assert_eq!(events[0].data, "one\ntwo");
    }

    #[test]
    fn test_decoder_split_utf8() {
        let bytes = "data: ¡hola!\n\n".as_bytes();
        let mut decoder = SseDecoder::new();
        // Split inside the two-byte '¡'.
        assert!(decoder.push(&bytes[..7]).is_empty());
        let events = decoder.push(&bytes[7..]);
        assert_eq!(events[0].data, "¡hola!");
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: [DONE]").is_empty());
        let event = decoder.finish().expect("pending event");
        assert_eq!(event.data, "[DONE]");
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_openai_chunks() {
        let delta = SseEvent {
            event: None,
            data: r#"{"choices":[{"delta":{"content":"PYT"}}]}"#.to_string(),
        };
        assert_eq!(
            decode_chunk(LlmProvider::OpenAI, &delta),
            StreamChunk::Fragment(Some("PYT".to_string()))
        );

        let role_only = SseEvent {
            event: None,
            data: r#"{"choices":[{"delta":{"role":"assistant"}}]}"#.to_string(),
        };
        assert_eq!(
            decode_chunk(LlmProvider::OpenAI, &role_only),
            StreamChunk::Fragment(None)
        );

        let done = SseEvent {
            event: None,
            data: "[DONE]".to_string(),
        };
        assert_eq!(decode_chunk(LlmProvider::OpenAI, &done), StreamChunk::Done);
    }

    #[test]
    fn test_anthropic_chunks() {
        let delta = SseEvent {
            event: Some("content_block_delta".to_string()),
            data: r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"HON"}}"#
                .to_string(),
        };
        assert_eq!(
            decode_chunk(LlmProvider::Anthropic, &delta),
            StreamChunk::Fragment(Some("HON".to_string()))
        );

        let ping = SseEvent {
            event: Some("ping".to_string()),
            data: r#"{"type":"ping"}"#.to_string(),
        };
        assert_eq!(decode_chunk(LlmProvider::Anthropic, &ping), StreamChunk::Skip);

        let overloaded = SseEvent {
            event: Some("error".to_string()),
            data: r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#
                .to_string(),
        };
        assert_eq!(
            decode_chunk(LlmProvider::Anthropic, &overloaded),
            StreamChunk::Failed("Overloaded".to_string())
        );

        let stop = SseEvent {
            event: Some("message_stop".to_string()),
            data: r#"{"type":"message_stop"}"#.to_string(),
        };
        assert_eq!(decode_chunk(LlmProvider::Anthropic, &stop), StreamChunk::Done);
    }
}
