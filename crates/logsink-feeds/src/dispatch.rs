//! Dispatcher — drains the input channel into a [`LogSinkHandler`].
//!
//! Every message is handled exactly once, in delivery order. Deliveries that
//! degrade (selector failed) or fail (backend error) are reported on the
//! error channel so nothing disappears silently.

use std::sync::Arc;

use logsink_core::{Delivery, EvaluationError, LogSinkHandler, Message, SinkError};
use tokio::sync::mpsc;

/// Create the bounded channel feeds push messages into.
pub fn input_channel(capacity: usize) -> (mpsc::Sender<Message>, mpsc::Receiver<Message>) {
    mpsc::channel(capacity.max(1))
}

/// Create the channel degraded and failed deliveries are reported on.
pub fn error_channel() -> (
    mpsc::UnboundedSender<SinkFailure>,
    mpsc::UnboundedReceiver<SinkFailure>,
) {
    mpsc::unbounded_channel()
}

#[derive(Debug)]
pub enum FailureKind {
    /// Logged, but the message stood in for the selected value.
    Degraded(EvaluationError),
    /// Not logged at all.
    Failed(SinkError),
}

/// A message that did not log as configured.
#[derive(Debug)]
pub struct SinkFailure {
    pub message: Message,
    pub kind: FailureKind,
}

impl std::fmt::Display for SinkFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            FailureKind::Degraded(err) => write!(f, "degraded delivery: {err}"),
            FailureKind::Failed(err) => write!(f, "delivery failed: {err}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub received: usize,
    pub logged: usize,
    pub suppressed: usize,
    pub degraded: usize,
    pub failed: usize,
}

/// Handle messages until every sender has been dropped.
pub async fn dispatch(
    mut input: mpsc::Receiver<Message>,
    handler: Arc<LogSinkHandler>,
    errors: Option<mpsc::UnboundedSender<SinkFailure>>,
) -> DispatchStats {
    let mut stats = DispatchStats::default();

    while let Some(message) = input.recv().await {
        stats.received += 1;
        let kind = match handler.handle(&message) {
            Ok(Delivery::Logged) => {
                stats.logged += 1;
                continue;
            }
            Ok(Delivery::Suppressed) => {
                stats.suppressed += 1;
                continue;
            }
            Ok(Delivery::Degraded(err)) => {
                stats.degraded += 1;
                FailureKind::Degraded(err)
            }
            Err(err) => {
                stats.failed += 1;
                FailureKind::Failed(err)
            }
        };
        report(errors.as_ref(), SinkFailure { message, kind });
    }

    tracing::debug!(?stats, "input channel drained");
    stats
}

fn report(errors: Option<&mpsc::UnboundedSender<SinkFailure>>, failure: SinkFailure) {
    let failure = match errors {
        Some(tx) => match tx.send(failure) {
            Ok(()) => return,
            Err(mpsc::error::SendError(failure)) => failure,
        },
        None => failure,
    };
    tracing::error!(received = %failure.message, "{failure}");
}

/// Log every reported failure at `error` until the channel closes.
/// Returns how many were seen.
pub async fn drain_errors(mut errors: mpsc::UnboundedReceiver<SinkFailure>) -> usize {
    let mut seen = 0;
    while let Some(failure) = errors.recv().await {
        seen += 1;
        tracing::error!(received = %failure.message, "{failure}");
    }
    seen
}
