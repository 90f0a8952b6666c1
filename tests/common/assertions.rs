//! Domain-specific assertion macros for logsink harnesses.
//!
//! These add context-rich failure messages that make it clear *what* sink
//! invariant was violated.

use logsink_core::{LogLevel, Message, Payload};

use crate::common::Emission;

/// Assert that an emission logged a text value equal to `expected`.
///
/// ```rust
/// assert_logged_text!(capture.last(), "FOO");
/// ```
#[macro_export]
macro_rules! assert_logged_text {
    ($emission:expr, $expected:expr) => {{
        let emission: &$crate::common::Emission = &$emission;
        let expected: &str = $expected;
        match emission.value.as_str() {
            Some(actual) if actual == expected => {}
            Some(actual) => panic!(
                "assert_logged_text! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            ),
            None => panic!(
                "assert_logged_text! failed: value is not text.\n  value: {:?}",
                emission.value
            ),
        }
    }};
}

/// Assert that an emission logged a whole message.
#[macro_export]
macro_rules! assert_logged_message {
    ($emission:expr) => {{
        let emission: &$crate::common::Emission = &$emission;
        match emission.value.as_message() {
            Some(message) => message.clone(),
            None => panic!(
                "assert_logged_message! failed: value is not a message.\n  value: {:?}",
                emission.value
            ),
        }
    }};
}

/// Assert that every emission in `emissions` was at `level`.
pub fn assert_all_at(emissions: &[Emission], level: LogLevel) {
    let wrong: Vec<_> = emissions.iter().filter(|e| e.level != level).collect();
    assert!(
        wrong.is_empty(),
        "expected every emission at {level}, found: {:?}",
        wrong.iter().map(|e| e.level).collect::<Vec<_>>()
    );
}

/// Assert that `logged` is `original` with its payload decoded to `text`
/// and its headers untouched.
pub fn assert_decoded(original: &Message, logged: &Message, text: &str) {
    assert_eq!(
        logged.payload(),
        &Payload::Text(text.to_string()),
        "payload should be decoded text"
    );
    assert_eq!(logged.headers(), original.headers(), "headers must be unchanged");
}
