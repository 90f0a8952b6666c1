use std::path::PathBuf;

use thiserror::Error;
use tokio_util::codec::AnyDelimiterCodecError;

use crate::FeedKind;

/// Errors that end a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read from {feed}: {source}")]
    Read {
        feed: FeedKind,
        #[source]
        source: AnyDelimiterCodecError,
    },

    #[error("input channel closed")]
    ChannelClosed,
}
