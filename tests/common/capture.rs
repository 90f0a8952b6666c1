//! CaptureLogger — a [`MessageLogger`] that records every emission.
//!
//! Besides the level and an owned copy of the value it records the address
//! of a logged whole message, so harnesses can tell "the very message that
//! was delivered" apart from "an equal copy".

use std::sync::Mutex;

use logsink_core::{BackendError, LogLevel, LogValue, Message, MessageLogger, OwnedLogValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub logger: String,
    pub level: LogLevel,
    pub value: OwnedLogValue,
    /// Address of the logged message for `LogValue::Message`.
    pub message_addr: Option<usize>,
}

impl Emission {
    pub fn is_same_message(&self, message: &Message) -> bool {
        self.message_addr == Some(message as *const Message as usize)
    }
}

#[derive(Debug, Default)]
pub struct CaptureLogger {
    name: String,
    emissions: Mutex<Vec<Emission>>,
    enabled_from: Option<LogLevel>,
}

impl CaptureLogger {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Only report levels at or above `threshold` as enabled.
    pub fn with_threshold(name: &str, threshold: LogLevel) -> Self {
        Self {
            enabled_from: Some(threshold),
            ..Self::new(name)
        }
    }

    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.emissions.lock().unwrap().len()
    }

    pub fn last(&self) -> Emission {
        self.emissions
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no emissions captured")
    }
}

impl MessageLogger for CaptureLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        self.enabled_from.map_or(true, |threshold| level >= threshold)
    }

    fn log(&self, level: LogLevel, value: &LogValue<'_>) -> Result<(), BackendError> {
        let message_addr = value
            .as_message()
            .map(|message| message as *const Message as usize);
        self.emissions.lock().unwrap().push(Emission {
            logger: self.name.clone(),
            level,
            value: value.clone().into_owned(),
            message_addr,
        });
        Ok(())
    }
}
