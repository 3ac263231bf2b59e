// ── Console state ──
//
// Everything the console shows, held behind one `Arc` and shared by the
// channel consumers and the command processor.

mod feeds;
mod log;
mod metrics;
mod status;

use std::sync::atomic::{AtomicBool, Ordering};

pub use feeds::{FeedStore, FeedTexts};
pub use log::{LogEntry, OperatorLog};
pub use metrics::{MetricKey, MetricValue, MetricsStore, MetricsTable};
pub use status::{ConnectionStatus, NO_MODE, StatusProjection};

pub(crate) use status::mode_or;

/// Shared console state.
///
/// Each component mutates it only through the owning store's methods,
/// each of which is a single atomic step.
pub struct ConsoleState {
    metrics: MetricsStore,
    status: StatusProjection,
    feeds: FeedStore,
    log: OperatorLog,
    streaming: AtomicBool,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self {
            metrics: MetricsStore::new(),
            status: StatusProjection::new(),
            feeds: FeedStore::new(),
            log: OperatorLog::new(),
            streaming: AtomicBool::new(true),
        }
    }

    pub fn metrics(&self) -> &MetricsStore {
        &self.metrics
    }

    pub fn status(&self) -> &StatusProjection {
        &self.status
    }

    pub fn feeds(&self) -> &FeedStore {
        &self.feeds
    }

    pub fn log(&self) -> &OperatorLog {
        &self.log
    }

    /// Whether status-channel messages are being applied.
    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::Acquire)
    }

    /// Pause or resume the status channel. While paused its messages are
    /// dropped; the channel itself stays connected.
    pub fn set_streaming(&self, enabled: bool) {
        self.streaming.store(enabled, Ordering::Release);
    }
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new()
    }
}
