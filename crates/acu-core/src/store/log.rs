// ── Operator log ──
//
// Append-only, timestamped record of everything the console did or saw.
// Snapshot readers and live subscribers observe entries in the same order.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::broadcast;

const LOG_CHANNEL_SIZE: usize = 256;

/// One operator log line, stamped when it was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub line: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.line)
    }
}

pub struct OperatorLog {
    entries: Mutex<Vec<Arc<LogEntry>>>,
    live: broadcast::Sender<Arc<LogEntry>>,
}

impl OperatorLog {
    pub fn new() -> Self {
        let (live, _) = broadcast::channel(LOG_CHANNEL_SIZE);
        Self {
            entries: Mutex::new(Vec::new()),
            live,
        }
    }

    /// Append a line stamped with the current local time.
    pub fn append(&self, line: impl Into<String>) -> Arc<LogEntry> {
        let entry = Arc::new(LogEntry {
            timestamp: Local::now(),
            line: line.into(),
        });
        let mut entries = self.lock();
        entries.push(Arc::clone(&entry));
        // Sent under the lock so subscribers see append order.
        let _ = self.live.send(Arc::clone(&entry));
        entry
    }

    pub fn entries(&self) -> Vec<Arc<LogEntry>> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Receive every entry appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<LogEntry>> {
        self.live.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<LogEntry>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for OperatorLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn entry_display_format() {
        let entry = LogEntry {
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 9, 7, 3).single().unwrap(),
            line: "[TX] $cmd,stop,*1c".into(),
        };
        assert_eq!(entry.to_string(), "[09:07:03] [TX] $cmd,stop,*1c");
    }

    #[test]
    fn append_snapshot_and_clear() {
        let log = OperatorLog::new();
        log.append("Ports refreshed.");
        log.append("Disconnected.");
        let lines: Vec<_> = log.entries().iter().map(|e| e.line.clone()).collect();
        assert_eq!(lines, vec!["Ports refreshed.", "Disconnected."]);

        log.clear();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn subscribers_receive_new_entries() {
        let log = OperatorLog::new();
        log.append("before subscribe");
        let mut rx = log.subscribe();
        log.append("after subscribe");

        let entry = rx.recv().await.unwrap();
        assert_eq!(entry.line, "after subscribe");
        assert_eq!(log.len(), 2);
    }
}
