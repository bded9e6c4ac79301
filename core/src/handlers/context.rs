use common::ResultEnvelope;
use std::time::Duration;
use tokio::sync::mpsc;

/// An outbound progress event. Terminal results go through the dispatcher's
/// return value instead, so only progress flows through this sink.
pub struct ProgressEvent {
    pub overwrite: bool,
    pub result: ResultEnvelope,
}

/// Everything a handler needs besides the request itself: where to publish
/// progress, and the shared tool-launch policy (timeouts). The direct
/// analogue of a per-connection session object, scoped to one measurement.
#[derive(Clone)]
pub struct HandlerContext {
    progress_tx: mpsc::UnboundedSender<ProgressEvent>,
    pub tool_timeout: Duration,
}

impl HandlerContext {
    pub fn new(progress_tx: mpsc::UnboundedSender<ProgressEvent>, tool_timeout: Duration) -> Self {
        Self {
            progress_tx,
            tool_timeout,
        }
    }

    pub fn emit_progress(&self, overwrite: bool, result: ResultEnvelope) {
        let _ = self.progress_tx.send(ProgressEvent { overwrite, result });
    }
}
