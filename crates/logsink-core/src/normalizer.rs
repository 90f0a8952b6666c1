//! Normalizer — turns textual byte payloads into text before selection.
//!
//! Only `Payload::Bytes` is ever touched. When the message's content type is
//! textual (see [`content_type::is_textual`]) the bytes are decoded as UTF-8
//! and a derived message is returned that shares the original headers. Every
//! other message comes back borrowed, unchanged.

use std::borrow::Cow;

use crate::content_type::{self, DEFAULT_CONTENT_TYPE};
use crate::error::ConfigError;
use crate::types::{Message, Payload};

/// What to do with a textual byte payload that is not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum DecodePolicy {
    /// Decode anyway, substituting U+FFFD for invalid sequences.
    #[default]
    Lossy,
    /// Leave the payload as raw bytes.
    Preserve,
}

impl std::fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodePolicy::Lossy => write!(f, "lossy"),
            DecodePolicy::Preserve => write!(f, "preserve"),
        }
    }
}

impl std::str::FromStr for DecodePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lossy" | "replace" => Ok(DecodePolicy::Lossy),
            "preserve" | "bytes" => Ok(DecodePolicy::Preserve),
            _ => Err(ConfigError::InvalidDecodePolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for DecodePolicy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    default_content_type: String,
    policy: DecodePolicy,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_TYPE, DecodePolicy::default())
    }
}

impl Normalizer {
    pub fn new(default_content_type: impl Into<String>, policy: DecodePolicy) -> Self {
        Self {
            default_content_type: default_content_type.into(),
            policy,
        }
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    pub fn default_content_type(&self) -> &str {
        &self.default_content_type
    }

    /// Decode the payload if it is textual bytes; otherwise borrow `message`.
    pub fn normalize<'a>(&self, message: &'a Message) -> Cow<'a, Message> {
        let Payload::Bytes(bytes) = message.payload() else {
            return Cow::Borrowed(message);
        };

        let content_type = content_type::resolve(message, &self.default_content_type);
        if !content_type::is_textual(&content_type) {
            return Cow::Borrowed(message);
        }

        match std::str::from_utf8(bytes) {
            Ok(text) => Cow::Owned(message.with_payload(text)),
            Err(err) => match self.policy {
                DecodePolicy::Lossy => {
                    tracing::debug!(
                        content_type = %content_type,
                        valid_up_to = err.valid_up_to(),
                        "payload is not valid UTF-8; decoding lossily"
                    );
                    Cow::Owned(message.with_payload(String::from_utf8_lossy(bytes).into_owned()))
                }
                DecodePolicy::Preserve => {
                    tracing::warn!(
                        content_type = %content_type,
                        valid_up_to = err.valid_up_to(),
                        "payload is not valid UTF-8; leaving it as bytes"
                    );
                    Cow::Borrowed(message)
                }
            },
        }
    }
}
