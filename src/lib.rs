//! logsink — a terminal message sink that logs what it receives.
//!
//! This crate wires the workspace together so the binary and the
//! integration harnesses share one bootstrap path.
//!
//! # Architecture
//!
//! ```text
//! Feed ──► input channel ──► Dispatcher ──► LogSinkHandler ──► MessageLogger
//!                                 │
//!                                 └──► error channel
//! ```
//!
//! The feed and the dispatcher run on their own tokio tasks. The run ends
//! when the feed reaches EOF and the channel has been drained.

use std::sync::Arc;

use anyhow::Context;
use logsink_core::config::{OutputBackend, SinkProperties};
use logsink_core::{LogSinkHandler, MessageLogger, TracingLogger, WriterLogger};
use logsink_feeds::{DispatchStats, FeedSource, Framer};

pub use logsink_core;
pub use logsink_feeds;

/// What a completed run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages the feed put on the input channel.
    pub fed: usize,
    pub stats: DispatchStats,
    /// Failures seen on the error channel.
    pub reported: usize,
}

/// Build the logger backend named by `output.backend`.
pub fn build_logger(properties: &SinkProperties) -> Arc<dyn MessageLogger> {
    let name = properties.log.name.clone();
    match properties.output.backend {
        OutputBackend::Tracing => Arc::new(TracingLogger::new(name)),
        OutputBackend::Stdout => Arc::new(WriterLogger::stdout(name)),
        OutputBackend::Stderr => Arc::new(WriterLogger::stderr(name)),
    }
}

/// Run the sink with the feed and logger the properties describe.
pub async fn run(properties: SinkProperties) -> anyhow::Result<RunSummary> {
    let source = FeedSource::from_properties(&properties.input)
        .context("input.source = \"file\" requires input.path")?;
    let logger = build_logger(&properties);
    run_with(&properties, source, logger).await
}

/// Run the sink against an explicit feed and logger.
pub async fn run_with(
    properties: &SinkProperties,
    source: FeedSource,
    logger: Arc<dyn MessageLogger>,
) -> anyhow::Result<RunSummary> {
    let handler = Arc::new(LogSinkHandler::from_properties(properties, logger));
    tracing::info!(
        logger = handler.logger_name(),
        level = %handler.level(),
        expression = %handler.selector(),
        feed = %source.kind(),
        "log sink started"
    );

    let (tx, rx) = logsink_feeds::input_channel(properties.input.buffer);
    let (err_tx, err_rx) = logsink_feeds::error_channel();

    let errors = tokio::spawn(logsink_feeds::drain_errors(err_rx));
    let dispatcher = tokio::spawn(logsink_feeds::dispatch(rx, handler, Some(err_tx)));
    let feed = source.spawn(Framer::new(properties.input.format), tx);

    // Let the dispatcher drain whatever the feed queued before reporting a
    // feed failure.
    let fed = feed.await.context("feed task panicked")?;
    let stats = dispatcher.await.context("dispatcher task panicked")?;
    let reported = errors.await.context("error channel task panicked")?;
    let fed = fed.context("feed failed")?;

    tracing::info!(fed, ?stats, reported, "log sink stopped");
    Ok(RunSummary {
        fed,
        stats,
        reported,
    })
}
