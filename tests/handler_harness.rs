#![allow(unused)]
//! Log emission integration harness.
//!
//! # What this covers
//!
//! - **Severity routing**: a sink configured at level L emits exactly one
//!   record per message, always at L.
//! - **Logger identity**: emissions go through the injected logger named by
//!   `log.name`.
//! - **Selectors**: `#this` logs the delivered message; projections log a
//!   derived scalar (`payload.toUpperCase()` on `"foo"` gives `"FOO"`).
//! - **Idempotence**: handling the same message twice gives two identical
//!   emissions.
//! - **Failure handling**: selector failures degrade to logging the message;
//!   disabled levels suppress emission.
//!
//! # Running
//!
//! ```sh
//! cargo test --test handler_harness
//! ```

mod common;
use common::*;

use logsink_core::config::SinkProperties;
use logsink_core::{Delivery, EvaluationError, LogLevel, LogSinkHandler};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Severity routing
// ---------------------------------------------------------------------------

#[rstest]
fn one_emission_at_configured_level(
    #[values(
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal
    )]
    level: LogLevel,
) {
    let (sink, capture) = HandlerBuilder::new().level(level).build();

    for payload in CORPUS_PAYLOADS {
        sink.handle(&MessageBuilder::text(payload).build()).unwrap();
    }

    assert_eq!(capture.count(), CORPUS_PAYLOADS.len());
    assert_all_at(&capture.emissions(), level);
}

#[test]
fn logger_named_by_properties() {
    let properties = SinkProperties::loader()
        .without_user_file()
        .without_env()
        .set("log.name", "foo")
        .set("log.level", "warn")
        .set("log.expression", "payload.toUpperCase()")
        .load()
        .unwrap();
    let capture = Arc::new(CaptureLogger::new(&properties.log.name));
    let sink = LogSinkHandler::from_properties(&properties, capture.clone());

    assert_eq!(sink.level(), LogLevel::Warn);
    assert_eq!(sink.logger_name(), "foo");

    sink.handle(&MessageBuilder::text("foo").build()).unwrap();

    let emission = capture.last();
    assert_eq!(emission.logger, "foo");
    assert_eq!(emission.level, LogLevel::Warn);
    assert_logged_text!(emission, "FOO");
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Same logger, two expressions: the projection first, then `#this`.
#[test]
fn projection_then_whole_message() {
    let capture = Arc::new(CaptureLogger::new("foo"));
    let upper = HandlerBuilder::new()
        .level(LogLevel::Warn)
        .expression("payload.toUpperCase()")
        .build_with(capture.clone());
    let this = HandlerBuilder::new()
        .level(LogLevel::Warn)
        .expression("#this")
        .build_with(capture.clone());
    let message = MessageBuilder::text("foo").build();

    upper.handle(&message).unwrap();
    assert_logged_text!(capture.last(), "FOO");

    this.handle(&message).unwrap();
    assert_eq!(capture.count(), 2);
    assert!(capture.last().is_same_message(&message));
    assert_all_at(&capture.emissions(), LogLevel::Warn);
}

#[rstest]
#[case::payload("payload", "foo")]
#[case::upper("payload.toUpperCase()", "FOO")]
#[case::lower("payload.toLowerCase()", "foo")]
#[case::length("payload.length()", "3")]
#[case::header("headers['id']", "m-1")]
#[case::header_dotted("headers.id.toUpperCase()", "M-1")]
#[case::missing_header("headers.nope", "null")]
fn projections_yield_scalars(#[case] expression: &str, #[case] expected: &str) {
    let (sink, capture) = HandlerBuilder::new().expression(expression).build();
    let message = MessageBuilder::bytes(b"foo")
        .content_type("text/plain")
        .header("id", "m-1")
        .build();

    sink.handle(&message).unwrap();

    assert_eq!(capture.last().value.to_string(), expected);
}

#[test]
fn structured_payload_projection() {
    let (sink, capture) = HandlerBuilder::new()
        .expression("payload.user.name.toUpperCase()")
        .build();
    let message = MessageBuilder::json(serde_json::json!({"user": {"name": "Ada"}})).build();

    sink.handle(&message).unwrap();

    assert_logged_text!(capture.last(), "ADA");
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[test]
fn handling_twice_emits_twice_identically() {
    let (sink, capture) = HandlerBuilder::new().expression("#this").build();
    let message = MessageBuilder::bytes(br#"{"foo":"bar"}"#)
        .content_type("application/json")
        .build();

    sink.handle(&message).unwrap();
    sink.handle(&message).unwrap();

    let emissions = capture.emissions();
    assert_eq!(emissions.len(), 2);
    assert_eq!(emissions[0].value, emissions[1].value);
    assert_eq!(emissions[0].level, emissions[1].level);
}

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------

#[test]
fn unknown_field_degrades_to_message() {
    let (sink, capture) = HandlerBuilder::new().expression("payload.missing").build();
    let message = MessageBuilder::json(serde_json::json!({"present": true})).build();

    let delivery = sink.handle(&message).unwrap();

    assert_eq!(
        delivery,
        Delivery::Degraded(EvaluationError::UnknownField("payload.missing".into()))
    );
    assert!(capture.last().is_same_message(&message));
}

#[test]
fn type_mismatch_on_bytes_degrades() {
    let (sink, capture) = HandlerBuilder::new()
        .expression("payload.toUpperCase()")
        .build();
    let message = MessageBuilder::bytes(b"\x00")
        .content_type("application/octet-stream")
        .build();

    let delivery = sink.handle(&message).unwrap();

    assert!(matches!(
        delivery,
        Delivery::Degraded(EvaluationError::TypeMismatch { found: "bytes", .. })
    ));
    assert_eq!(capture.count(), 1);
}

#[test]
fn levels_below_threshold_are_suppressed() {
    let capture = Arc::new(CaptureLogger::with_threshold("quiet", LogLevel::Warn));
    let debug = HandlerBuilder::new()
        .level(LogLevel::Debug)
        .build_with(capture.clone());
    let error = HandlerBuilder::new()
        .level(LogLevel::Error)
        .build_with(capture.clone());
    let message = MessageBuilder::text("x").build();

    assert_eq!(debug.handle(&message).unwrap(), Delivery::Suppressed);
    assert_eq!(error.handle(&message).unwrap(), Delivery::Logged);
    assert_eq!(capture.count(), 1);
}

/// A handler shared across threads emits once per delivery on each.
#[test]
fn concurrent_deliveries_share_one_handler() {
    let (sink, capture) = HandlerBuilder::new().build();
    let sink = Arc::new(sink);

    let threads: Vec<_> = (0..4)
        .map(|t| {
            let sink = Arc::clone(&sink);
            std::thread::spawn(move || {
                for i in 0..25 {
                    sink.handle(&MessageBuilder::text(&format!("{t}-{i}")).build())
                        .unwrap();
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }

    assert_eq!(capture.count(), 100);
}
