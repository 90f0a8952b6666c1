//! Emitter — the logging backends a sink writes through.
//!
//! The handler never looks a logger up by name; it is handed a
//! [`MessageLogger`] at construction. Two backends ship with the crate:
//!
//! - [`TracingLogger`] forwards to the process-wide `tracing` subscriber.
//! - [`WriterLogger`] writes plain lines to stdout, stderr, or any writer.

use std::io::Write;
use std::sync::Mutex;

use crate::error::BackendError;
use crate::types::LogLevel;
use crate::value::LogValue;

/// `tracing` target used for every sink emission.
pub const SINK_TARGET: &str = "logsink::sink";

/// A named logger the sink emits values through.
pub trait MessageLogger: Send + Sync {
    /// Logger identifier, i.e. the configured `log.name`.
    fn name(&self) -> &str;

    /// Whether an emission at `level` would be recorded at all.
    fn is_enabled(&self, _level: LogLevel) -> bool {
        true
    }

    fn log(&self, level: LogLevel, value: &LogValue<'_>) -> Result<(), BackendError>;
}

// ---------------------------------------------------------------------------
// tracing backend
// ---------------------------------------------------------------------------

/// Emits each value as a `tracing` event under [`SINK_TARGET`].
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MessageLogger for TracingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Trace => tracing::enabled!(target: SINK_TARGET, tracing::Level::TRACE),
            LogLevel::Debug => tracing::enabled!(target: SINK_TARGET, tracing::Level::DEBUG),
            LogLevel::Info => tracing::enabled!(target: SINK_TARGET, tracing::Level::INFO),
            LogLevel::Warn => tracing::enabled!(target: SINK_TARGET, tracing::Level::WARN),
            LogLevel::Error | LogLevel::Fatal => {
                tracing::enabled!(target: SINK_TARGET, tracing::Level::ERROR)
            }
        }
    }

    fn log(&self, level: LogLevel, value: &LogValue<'_>) -> Result<(), BackendError> {
        let logger = self.name.as_str();
        match level {
            LogLevel::Trace => tracing::trace!(target: SINK_TARGET, logger, "{value}"),
            LogLevel::Debug => tracing::debug!(target: SINK_TARGET, logger, "{value}"),
            LogLevel::Info => tracing::info!(target: SINK_TARGET, logger, "{value}"),
            LogLevel::Warn => tracing::warn!(target: SINK_TARGET, logger, "{value}"),
            LogLevel::Error => tracing::error!(target: SINK_TARGET, logger, "{value}"),
            // tracing has no level above ERROR.
            LogLevel::Fatal => {
                tracing::error!(target: SINK_TARGET, logger, fatal = true, "{value}")
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Writer backend
// ---------------------------------------------------------------------------

/// Writes `LEVEL name - value` lines to a shared writer.
pub struct WriterLogger {
    name: String,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl WriterLogger {
    pub fn new(name: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout(name: impl Into<String>) -> Self {
        Self::new(name, std::io::stdout())
    }

    pub fn stderr(name: impl Into<String>) -> Self {
        Self::new(name, std::io::stderr())
    }
}

impl std::fmt::Debug for WriterLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterLogger")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl MessageLogger for WriterLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, level: LogLevel, value: &LogValue<'_>) -> Result<(), BackendError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| BackendError::Unavailable(self.name.clone()))?;
        writeln!(writer, "{level} {} - {value}", self.name)
            .and_then(|()| writer.flush())
            .map_err(|source| BackendError::Io {
                logger: self.name.clone(),
                source,
            })
    }
}
