//! The log sink handler: normalize, select, emit.

use std::sync::Arc;

use crate::config::SinkProperties;
use crate::emitter::MessageLogger;
use crate::error::{EvaluationError, Result};
use crate::normalizer::Normalizer;
use crate::selector::Selector;
use crate::types::{LogLevel, Message};
use crate::value::LogValue;

/// Outcome of handling one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The selected value was emitted.
    Logged,
    /// The logger is not enabled at the configured level; nothing was emitted.
    Suppressed,
    /// The selector failed; the message itself was emitted in its place.
    Degraded(EvaluationError),
}

/// Consumes messages and writes one log line per message.
///
/// Stateless apart from its immutable settings, so a single handler can be
/// shared across delivery tasks behind an [`Arc`].
pub struct LogSinkHandler {
    logger: Arc<dyn MessageLogger>,
    level: LogLevel,
    selector: Selector,
    normalizer: Normalizer,
}

impl LogSinkHandler {
    pub fn new(
        logger: Arc<dyn MessageLogger>,
        level: LogLevel,
        selector: Selector,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            logger,
            level,
            selector,
            normalizer,
        }
    }

    /// Build a handler from loaded properties around an injected logger.
    pub fn from_properties(properties: &SinkProperties, logger: Arc<dyn MessageLogger>) -> Self {
        Self::new(
            logger,
            properties.log.level,
            properties.log.expression.clone(),
            Normalizer::new(
                properties.input.default_content_type.clone(),
                properties.log.decode,
            ),
        )
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn logger_name(&self) -> &str {
        self.logger.name()
    }

    pub fn handle(&self, message: &Message) -> Result<Delivery> {
        let message = self.normalizer.normalize(message);

        if !self.logger.is_enabled(self.level) {
            return Ok(Delivery::Suppressed);
        }

        match self.selector.evaluate(&message) {
            Ok(value) => {
                self.logger.log(self.level, &value)?;
                Ok(Delivery::Logged)
            }
            Err(err) => {
                tracing::debug!(
                    logger = self.logger.name(),
                    expression = %self.selector,
                    error = %err,
                    "expression failed; logging the message instead"
                );
                self.logger.log(self.level, &LogValue::Message(&message))?;
                Ok(Delivery::Degraded(err))
            }
        }
    }
}

impl std::fmt::Debug for LogSinkHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSinkHandler")
            .field("logger", &self.logger.name())
            .field("level", &self.level)
            .field("selector", &self.selector.to_string())
            .field("normalizer", &self.normalizer)
            .finish()
    }
}
