//! Content-type classification for byte payloads.
//!
//! Matching is a plain, case-sensitive substring test against the markers in
//! [`TEXTUAL_MARKERS`]. It is deliberately not MIME parsing: any content type
//! that merely contains one of the markers counts as textual.

use crate::types::Message;

/// The substrate's content type when a message carries no `contentType` header.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Substrings that mark a content type as decodable text.
pub const TEXTUAL_MARKERS: [&str; 3] = ["text", "json", "x-spring-tuple"];

/// Returns `true` if a payload of `content_type` should be decoded as UTF-8.
pub fn is_textual(content_type: &str) -> bool {
    TEXTUAL_MARKERS
        .iter()
        .any(|marker| content_type.contains(marker))
}

/// The message's `contentType` header, or `default` when it has none.
pub fn resolve(message: &Message, default: &str) -> String {
    message
        .content_type()
        .unwrap_or_else(|| default.to_string())
}
