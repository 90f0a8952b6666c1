use logsink_core::Message;
use tokio::sync::mpsc;

use crate::error::FeedError;
use crate::frame::Framer;
use crate::lines;
use crate::FeedKind;

/// Feed messages from the process's standard input until EOF.
pub async fn run(framer: Framer, sender: mpsc::Sender<Message>) -> Result<usize, FeedError> {
    tracing::info!(format = ?framer.format(), "starting stdin feed");
    let count = lines::pump(tokio::io::stdin(), FeedKind::Stdin, framer, &sender).await?;
    tracing::info!(messages = count, "stdin EOF reached");
    Ok(count)
}
