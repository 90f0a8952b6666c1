//! Core types for logsink-core.
//!
//! This module defines the fundamental data structures shared across the
//! sink: the [`Message`] envelope, its [`Payload`] and [`Headers`], and the
//! [`LogLevel`] a message is emitted at.

use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Header key carrying the payload's content type.
pub const CONTENT_TYPE: &str = "contentType";

/// Header key stamped by feeds with the ingest time in epoch milliseconds.
pub const TIMESTAMP: &str = "timestamp";

/// String-keyed message headers. Values are JSON so headers can carry
/// numbers, flags, and nested metadata as well as strings.
pub type Headers = BTreeMap<String, serde_json::Value>;

/// The body of a [`Message`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw bytes as received from the wire.
    Bytes(Bytes),
    /// Text, either sent as such or decoded by the normalizer.
    Text(String),
    /// An already-structured value.
    Structured(serde_json::Value),
}

impl Payload {
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(bytes))
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Structured(value)
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Bytes(bytes) => write!(f, "byte[{}]", bytes.len()),
            Payload::Text(text) => f.write_str(text),
            Payload::Structured(value) => write_json(f, value),
        }
    }
}

/// An immutable message envelope delivered by the input channel.
///
/// Headers live behind an [`Arc`]: a message derived with
/// [`Message::with_payload`] shares the exact header map of its origin, so
/// nothing downstream can observe a header change it did not make itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    payload: Payload,
    headers: Arc<Headers>,
}

impl Message {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            payload: payload.into(),
            headers: Arc::new(Headers::new()),
        }
    }

    pub fn with_headers(payload: impl Into<Payload>, headers: Headers) -> Self {
        Self {
            payload: payload.into(),
            headers: Arc::new(headers),
        }
    }

    /// Derive a new message carrying `payload` and this message's headers.
    pub fn with_payload(&self, payload: impl Into<Payload>) -> Self {
        Self {
            payload: payload.into(),
            headers: Arc::clone(&self.headers),
        }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns `true` when both messages share the same header map allocation.
    pub fn shares_headers_with(&self, other: &Message) -> bool {
        Arc::ptr_eq(&self.headers, &other.headers)
    }

    pub fn header(&self, key: &str) -> Option<&serde_json::Value> {
        self.headers.get(key)
    }

    /// The `contentType` header rendered as a string, if present.
    pub fn content_type(&self) -> Option<String> {
        self.header(CONTENT_TYPE).map(header_text)
    }
}

/// Renders like `Message [payload=foo, headers={contentType=text/plain}]`.
impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Message [payload={}, headers={{", self.payload)?;
        for (i, (key, value)) in self.headers.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}=")?;
            write_json(f, value)?;
        }
        f.write_str("}]")
    }
}

/// Header values are shown without JSON quoting when they are plain strings.
pub fn header_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn write_json(
    f: &mut std::fmt::Formatter<'_>,
    value: &serde_json::Value,
) -> std::fmt::Result {
    match value {
        serde_json::Value::String(s) => f.write_str(s),
        other => write!(f, "{other}"),
    }
}

/// Log severity level a sink emits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Case-insensitive: `warn`, `WARN` and `Warn` all parse.
impl std::str::FromStr for LogLevel {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(crate::error::ConfigError::InvalidLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = crate::error::ConfigError;

    fn try_from(value: String) -> Result<Self, crate::error::ConfigError> {
        value.parse()
    }
}
