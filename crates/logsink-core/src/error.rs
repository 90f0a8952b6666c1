use thiserror::Error;

/// Errors raised while loading or validating sink properties.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log level {0:?}; expected one of TRACE, DEBUG, INFO, WARN, ERROR, FATAL")]
    InvalidLevel(String),

    #[error("invalid decode policy {0:?}; expected `lossy` or `preserve`")]
    InvalidDecodePolicy(String),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// A selector expression that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,

    #[error("unknown root {0:?} in expression; expected `#this`, `payload` or `headers`")]
    UnknownRoot(String),

    #[error("unsupported method `{0}()`")]
    UnknownMethod(String),

    #[error("malformed expression at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: &'static str },
}

/// A compiled selector that could not resolve against a particular message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("field `{0}` not found")]
    UnknownField(String),

    #[error("cannot apply `{operation}` to a {found} value")]
    TypeMismatch {
        operation: String,
        found: &'static str,
    },
}

/// The logging backend rejected an emission.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("logger `{logger}` failed to write: {source}")]
    Io {
        logger: String,
        #[source]
        source: std::io::Error,
    },

    #[error("logger `{0}` is unavailable")]
    Unavailable(String),
}

/// Failure to deliver a message to the sink. Selector and decode problems
/// degrade locally and never show up here.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T> = std::result::Result<T, SinkError>;
