use bytes::Bytes;

use crate::types::{write_json, Message};

/// The value handed to a [`MessageLogger`](crate::emitter::MessageLogger).
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue<'a> {
    /// The whole message, as produced by `#this`.
    Message(&'a Message),
    /// A raw byte payload.
    Bytes(Bytes),
    /// Anything else a projection yields.
    Json(serde_json::Value),
}

impl LogValue<'_> {
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            LogValue::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LogValue::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Detach from the message borrow, e.g. to keep a captured value around.
    pub fn into_owned(self) -> OwnedLogValue {
        match self {
            LogValue::Message(message) => OwnedLogValue::Message(message.clone()),
            LogValue::Bytes(bytes) => OwnedLogValue::Bytes(bytes),
            LogValue::Json(value) => OwnedLogValue::Json(value),
        }
    }
}

impl std::fmt::Display for LogValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogValue::Message(message) => write!(f, "{message}"),
            LogValue::Bytes(bytes) => write!(f, "byte[{}]", bytes.len()),
            LogValue::Json(value) => write_json(f, value),
        }
    }
}

/// Owned counterpart of [`LogValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedLogValue {
    Message(Message),
    Bytes(Bytes),
    Json(serde_json::Value),
}

impl OwnedLogValue {
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            OwnedLogValue::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OwnedLogValue::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for OwnedLogValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnedLogValue::Message(message) => write!(f, "{message}"),
            OwnedLogValue::Bytes(bytes) => write!(f, "byte[{}]", bytes.len()),
            OwnedLogValue::Json(value) => write_json(f, value),
        }
    }
}
