use std::path::Path;

use logsink_core::Message;
use tokio::sync::mpsc;

use crate::error::FeedError;
use crate::frame::Framer;
use crate::lines;
use crate::FeedKind;

/// Feed messages from every line of the file at `path`, then stop.
pub async fn run(
    path: &Path,
    framer: Framer,
    sender: mpsc::Sender<Message>,
) -> Result<usize, FeedError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| FeedError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), format = ?framer.format(), "starting file feed");
    let count = lines::pump(file, FeedKind::File, framer, &sender).await?;
    tracing::info!(path = %path.display(), messages = count, "file feed complete");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsink_core::config::InputFormat;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[tokio::test]
    async fn reads_every_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file, "second").unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let count = run(file.path(), Framer::new(InputFormat::Raw), tx).await.unwrap();
        assert_eq!(count, 2);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.payload().as_bytes().map(|b| b.as_ref()), Some(&b"first"[..]));
    }

    #[tokio::test]
    async fn missing_file_is_an_open_error() {
        let (tx, _rx) = mpsc::channel(1);
        let err = run(Path::new("/definitely/not/here.log"), Framer::new(InputFormat::Raw), tx)
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Open { .. }));
    }
}
