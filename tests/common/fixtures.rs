//! Static content-type and payload corpora used across harnesses.

/// Content types the normalizer must decode.
pub const TEXTUAL_CONTENT_TYPES: &[&str] = &[
    "text/plain",
    "text/plain;charset=UTF-8",
    "text/csv",
    "application/json",
    "application/json;charset=UTF-8",
    "application/vnd.api+json",
    "application/x-spring-tuple",
];

/// Content types the normalizer must leave alone.
pub const BINARY_CONTENT_TYPES: &[&str] = &[
    "application/octet-stream",
    "application/x-protobuf",
    "application/avro",
    "image/png",
    "application/x-java-serialized-object",
];

/// Representative payload lines.
pub const CORPUS_PAYLOADS: &[&str] = &[
    r#"{"foo":"bar"}"#,
    r#"{"ts":"2024-01-15T10:00:00Z","level":"INFO","message":"Server started","port":8080}"#,
    "plain text line",
    "ts=2024-01-15T10:00:01Z level=error msg=\"Connection refused\"",
    "ünïcödé ✓ payload",
    "",
];

/// Envelope lines as the `envelope` input format expects them.
pub const CORPUS_ENVELOPES: &[&str] = &[
    r#"{"payload":"{\"foo\":\"bar\"}","headers":{"contentType":"application/json"}}"#,
    r#"{"payload":"hello","headers":{"contentType":"text/plain","id":"m-2"}}"#,
    r#"{"payload":"AAEC","headers":{"contentType":"application/octet-stream"}}"#,
    r#"{"payload":{"user":{"name":"Ada"}},"headers":{"contentType":"application/json"}}"#,
];
