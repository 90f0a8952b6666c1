//! Newline-delimited frame reading shared by every feed.

use futures::StreamExt;
use logsink_core::Message;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};

use crate::error::FeedError;
use crate::frame::Framer;
use crate::FeedKind;

/// Longest line accepted before the feed fails.
pub const MAX_LINE_BYTES: usize = 8 * 1024 * 1024;

/// Read `reader` to EOF, sending one message per non-empty line.
///
/// A trailing `\r` is stripped so CRLF input frames the same as LF input.
/// Returns the number of messages sent.
pub async fn pump<R>(
    reader: R,
    feed: FeedKind,
    framer: Framer,
    sender: &mpsc::Sender<Message>,
) -> Result<usize, FeedError>
where
    R: AsyncRead + Unpin,
{
    let codec = AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), MAX_LINE_BYTES);
    let mut frames = FramedRead::new(reader, codec);
    let mut count = 0;

    while let Some(frame) = frames.next().await {
        let mut line = frame.map_err(|source| FeedError::Read { feed, source })?;
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        if line.is_empty() {
            continue;
        }

        let message = framer.frame(line);
        if sender.send(message).await.is_err() {
            tracing::warn!(%feed, "input channel closed, stopping feed");
            return Err(FeedError::ChannelClosed);
        }
        count += 1;
    }

    tracing::debug!(%feed, messages = count, "feed reached EOF");
    Ok(count)
}
