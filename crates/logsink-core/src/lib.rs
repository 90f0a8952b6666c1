//! logsink-core — message model and log-emission rule for logsink.
//!
//! A sink consumes one message at a time and writes exactly one log line
//! for it:
//!
//! ```text
//! Message ──► Normalizer ──► Selector ──► MessageLogger
//!             (bytes → text)   (#this, payload.…)   (tracing | writer)
//! ```
//!
//! [`LogSinkHandler`] ties the three stages together. Everything it needs is
//! resolved when [`config::SinkProperties`] load; handling a message touches
//! no shared mutable state.

pub mod config;
pub mod content_type;
pub mod emitter;
pub mod error;
pub mod handler;
pub mod normalizer;
pub mod selector;
pub mod types;
pub mod value;

pub use emitter::{MessageLogger, TracingLogger, WriterLogger};
pub use error::{BackendError, ConfigError, EvaluationError, ExpressionError, SinkError};
pub use handler::{Delivery, LogSinkHandler};
pub use normalizer::{DecodePolicy, Normalizer};
pub use selector::Selector;
pub use types::{Headers, LogLevel, Message, Payload};
pub use value::{LogValue, OwnedLogValue};
