//! Configuration types for logsink.
//!
//! Properties are layered, later sources winning:
//!
//! 1. the embedded [`DEFAULT_CONFIG`],
//! 2. `$XDG_CONFIG_HOME/logsink/config.toml` if it exists, or an explicit
//!    file given with [`PropertiesLoader::file`],
//! 3. `LOGSINK_`-prefixed environment variables (`LOGSINK_LOG__LEVEL=warn`),
//! 4. explicit overrides (command-line flags).
//!
//! [`SinkProperties::defaults`] returns layer 1 alone without touching the
//! filesystem or environment (useful in tests).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::content_type::DEFAULT_CONTENT_TYPE;
use crate::error::ConfigError;
use crate::normalizer::DecodePolicy;
use crate::selector::Selector;
use crate::types::LogLevel;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_CONFIG: &str = r#"
[log]
name       = "log-sink"
level      = "INFO"
expression = "payload"
decode     = "lossy"

[input]
source               = "stdin"
format               = "raw"
default_content_type = "application/json"
buffer               = 1024

[output]
backend = "tracing"
"#;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "LOGSINK";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level sink properties. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkProperties {
    #[serde(default)]
    pub log: LogProperties,
    #[serde(default)]
    pub input: InputProperties,
    #[serde(default)]
    pub output: OutputProperties,
}

/// `[log]` section: what gets logged, where, and how loudly.
#[derive(Debug, Clone, Deserialize)]
pub struct LogProperties {
    /// Logger identifier.
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: LogLevel,
    /// Compiled from the `expression` string at load time.
    #[serde(default)]
    pub expression: Selector,
    #[serde(default)]
    pub decode: DecodePolicy,
}

fn default_name() -> String { "log-sink".to_string() }
fn default_level() -> LogLevel { LogLevel::Info }

impl Default for LogProperties {
    fn default() -> Self {
        Self {
            name: default_name(),
            level: default_level(),
            expression: Selector::default(),
            decode: DecodePolicy::default(),
        }
    }
}

/// `[input]` section: where messages come from.
#[derive(Debug, Clone, Deserialize)]
pub struct InputProperties {
    #[serde(default)]
    pub source: InputSource,
    /// Required when `source = "file"`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub format: InputFormat,
    /// Content type assumed for messages without a `contentType` header.
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
    /// Capacity of the input channel.
    #[serde(default = "default_buffer")]
    pub buffer: usize,
}

fn default_content_type() -> String { DEFAULT_CONTENT_TYPE.to_string() }
fn default_buffer() -> usize { 1024 }

impl Default for InputProperties {
    fn default() -> Self {
        Self {
            source: InputSource::default(),
            path: None,
            format: InputFormat::default(),
            default_content_type: default_content_type(),
            buffer: default_buffer(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    #[default]
    Stdin,
    File,
}

/// How each inbound line is framed into a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// The line is the raw byte payload.
    #[default]
    Raw,
    /// The line is a JSON `{"payload": …, "headers": {…}}` envelope.
    Envelope,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputProperties {
    #[serde(default)]
    pub backend: OutputBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputBackend {
    #[default]
    Tracing,
    Stdout,
    Stderr,
}

impl Default for SinkProperties {
    fn default() -> Self {
        Self::defaults()
    }
}

impl SinkProperties {
    /// Layer the user config file, environment, and nothing else.
    pub fn load() -> Result<Self, ConfigError> {
        PropertiesLoader::new().load()
    }

    pub fn loader() -> PropertiesLoader {
        PropertiesLoader::new()
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Reject combinations serde cannot express on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.source == InputSource::File && self.input.path.is_none() {
            return Err(ConfigError::Load(config::ConfigError::Message(
                "input.source = \"file\" requires input.path".to_string(),
            )));
        }
        if self.input.buffer == 0 {
            return Err(ConfigError::Load(config::ConfigError::Message(
                "input.buffer must be at least 1".to_string(),
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Builder for layered [`SinkProperties`].
#[derive(Debug, Clone)]
pub struct PropertiesLoader {
    file: Option<PathBuf>,
    user_file: bool,
    env: bool,
    env_source: Option<HashMap<String, String>>,
    overrides: Vec<(String, String)>,
}

impl Default for PropertiesLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertiesLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            user_file: true,
            env: true,
            env_source: None,
            overrides: Vec::new(),
        }
    }

    /// Use `path` instead of the per-user config file. The file must exist.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Skip the per-user config file.
    pub fn without_user_file(mut self) -> Self {
        self.user_file = false;
        self
    }

    /// Skip environment overrides entirely.
    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    /// Read environment overrides from `vars` instead of the process environment.
    pub fn env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env = true;
        self.env_source = Some(vars);
        self
    }

    /// Set `key` (dotted, e.g. `log.level`) to `value`, overriding every layer.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Like [`set`](Self::set) but a no-op for `None`.
    pub fn set_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    pub fn load(self) -> Result<SinkProperties, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        match (&self.file, self.user_file) {
            (Some(path), _) => {
                builder = builder.add_source(
                    config::File::from(path.as_path())
                        .format(config::FileFormat::Toml)
                        .required(true),
                );
            }
            (None, true) => {
                builder = builder.add_source(
                    config::File::from(config_path().as_path())
                        .format(config::FileFormat::Toml)
                        .required(false),
                );
            }
            (None, false) => {}
        }

        if self.env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(self.env_source),
            );
        }

        for (key, value) in self.overrides {
            builder = builder.set_override(key, value)?;
        }

        let properties: SinkProperties = builder.build()?.try_deserialize()?;
        properties.validate()?;
        Ok(properties)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logsink")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
