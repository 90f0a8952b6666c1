//! Test builders — ergonomic constructors for `Message` and handlers.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::sync::Arc;

use logsink_core::types::CONTENT_TYPE;
use logsink_core::{
    DecodePolicy, Headers, LogLevel, LogSinkHandler, Message, Normalizer, Payload, Selector,
};

// ---------------------------------------------------------------------------
// MessageBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Message`] test fixtures.
///
/// # Example
///
/// ```rust
/// let message = MessageBuilder::bytes(br#"{"foo":"bar"}"#)
///     .content_type("application/json")
///     .header("id", 7)
///     .build();
/// ```
pub struct MessageBuilder {
    payload: Payload,
    headers: Headers,
}

impl MessageBuilder {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            payload: payload.into(),
            headers: Headers::new(),
        }
    }

    pub fn bytes(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }

    pub fn text(text: &str) -> Self {
        Self::new(text)
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self::new(value)
    }

    pub fn content_type(self, content_type: &str) -> Self {
        self.header(CONTENT_TYPE, content_type)
    }

    pub fn header(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.headers.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> Message {
        Message::with_headers(self.payload, self.headers)
    }
}

// ---------------------------------------------------------------------------
// HandlerBuilder
// ---------------------------------------------------------------------------

/// Builds a [`LogSinkHandler`] wired to a fresh [`CaptureLogger`](crate::common::CaptureLogger).
pub struct HandlerBuilder {
    name: String,
    level: LogLevel,
    expression: String,
    default_content_type: String,
    decode: DecodePolicy,
}

impl HandlerBuilder {
    pub fn new() -> Self {
        Self {
            name: "test-sink".to_string(),
            level: LogLevel::Info,
            expression: "payload".to_string(),
            default_content_type: "application/json".to_string(),
            decode: DecodePolicy::Lossy,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn expression(mut self, expression: &str) -> Self {
        self.expression = expression.to_string();
        self
    }

    pub fn default_content_type(mut self, content_type: &str) -> Self {
        self.default_content_type = content_type.to_string();
        self
    }

    pub fn decode(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }

    /// Build the handler with a new capture logger and return both.
    pub fn build(self) -> (LogSinkHandler, Arc<crate::common::CaptureLogger>) {
        let logger = Arc::new(crate::common::CaptureLogger::new(&self.name));
        let handler = self.build_with(logger.clone());
        (handler, logger)
    }

    /// Build the handler around an existing capture logger.
    pub fn build_with(self, logger: Arc<crate::common::CaptureLogger>) -> LogSinkHandler {
        LogSinkHandler::new(
            logger,
            self.level,
            Selector::parse(&self.expression).expect("test expression must parse"),
            Normalizer::new(self.default_content_type, self.decode),
        )
    }
}
