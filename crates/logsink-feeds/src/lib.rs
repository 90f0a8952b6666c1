//! logsink-feeds — the inbound side of logsink.
//!
//! A feed reads newline-delimited frames from its source, frames each one
//! into a [`logsink_core::Message`], and pushes it onto the input channel.
//! The [`dispatch`](dispatch::dispatch) loop drains that channel into a
//! [`logsink_core::LogSinkHandler`].

pub mod dispatch;
pub mod error;
pub mod file;
pub mod frame;
pub mod lines;
pub mod stdin;

use std::path::PathBuf;

use logsink_core::config::{InputProperties, InputSource};
use logsink_core::Message;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use dispatch::{dispatch, drain_errors, error_channel, input_channel, DispatchStats, SinkFailure};
pub use error::FeedError;
pub use frame::Framer;

/// Which feed produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    File,
    Stdin,
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedKind::File => write!(f, "file"),
            FeedKind::Stdin => write!(f, "stdin"),
        }
    }
}

/// A configured message source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Stdin,
    File(PathBuf),
}

impl FeedSource {
    /// `None` when `source = "file"` is missing its path.
    pub fn from_properties(input: &InputProperties) -> Option<Self> {
        match input.source {
            InputSource::Stdin => Some(FeedSource::Stdin),
            InputSource::File => input.path.clone().map(FeedSource::File),
        }
    }

    pub fn kind(&self) -> FeedKind {
        match self {
            FeedSource::Stdin => FeedKind::Stdin,
            FeedSource::File(_) => FeedKind::File,
        }
    }

    /// Read the source to EOF. Returns the number of messages sent.
    pub async fn run(self, framer: Framer, sender: mpsc::Sender<Message>) -> Result<usize, FeedError> {
        match self {
            FeedSource::Stdin => stdin::run(framer, sender).await,
            FeedSource::File(path) => file::run(&path, framer, sender).await,
        }
    }

    pub fn spawn(self, framer: Framer, sender: mpsc::Sender<Message>) -> JoinHandle<Result<usize, FeedError>> {
        tokio::spawn(self.run(framer, sender))
    }
}
