//! Framing — turns one inbound line into a [`Message`].
//!
//! | Format | Payload | Headers |
//! |--------|---------|---------|
//! | `raw` | the line's bytes | `timestamp` |
//! | `envelope` | `payload` (a JSON string is kept as bytes) | `headers` + `timestamp` |
//!
//! A line that does not parse as an envelope degrades to a raw frame.

use bytes::Bytes;
use logsink_core::config::InputFormat;
use logsink_core::types::TIMESTAMP;
use logsink_core::{Headers, Message, Payload};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    payload: serde_json::Value,
    #[serde(default)]
    headers: Headers,
}

#[derive(Debug, Clone, Copy)]
pub struct Framer {
    format: InputFormat,
    stamp: bool,
}

impl Framer {
    pub fn new(format: InputFormat) -> Self {
        Self {
            format,
            stamp: true,
        }
    }

    /// Do not add a `timestamp` header to framed messages.
    pub fn without_timestamp(mut self) -> Self {
        self.stamp = false;
        self
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn frame(&self, line: Bytes) -> Message {
        match self.format {
            InputFormat::Raw => self.raw(line),
            InputFormat::Envelope => match serde_json::from_slice::<Envelope>(&line) {
                Ok(envelope) => self.envelope(envelope),
                Err(err) => {
                    tracing::warn!(error = %err, len = line.len(), "line is not a message envelope; framing it raw");
                    self.raw(line)
                }
            },
        }
    }

    fn raw(&self, line: Bytes) -> Message {
        let mut headers = Headers::new();
        self.stamp(&mut headers);
        Message::with_headers(line, headers)
    }

    fn envelope(&self, envelope: Envelope) -> Message {
        let Envelope {
            payload,
            mut headers,
        } = envelope;
        self.stamp(&mut headers);
        let payload = match payload {
            serde_json::Value::String(text) => Payload::Bytes(Bytes::from(text)),
            other => Payload::Structured(other),
        };
        Message::with_headers(payload, headers)
    }

    fn stamp(&self, headers: &mut Headers) {
        if self.stamp {
            headers
                .entry(TIMESTAMP.to_string())
                .or_insert_with(|| chrono::Utc::now().timestamp_millis().into());
        }
    }
}
