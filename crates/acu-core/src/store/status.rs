// ── Connection status projection ──
//
// `connected` + `mode` as last written by either an explicit
// connect/disconnect result or a status-channel message. No history,
// no sequencing between the two writers.

use serde::Serialize;
use tokio::sync::watch;

/// Placeholder mode shown while nothing is connected.
pub const NO_MODE: &str = "-";

/// Whether the backend holds an antenna link, and over what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub mode: String,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self {
            connected: false,
            mode: NO_MODE.into(),
        }
    }
}

/// Shared connection status with change notification.
pub struct StatusProjection {
    status: watch::Sender<ConnectionStatus>,
}

impl StatusProjection {
    pub fn new() -> Self {
        let (status, _) = watch::channel(ConnectionStatus::default());
        Self { status }
    }

    /// Overwrite the status. Returns whether it changed.
    pub fn set(&self, connected: bool, mode: impl Into<String>) -> bool {
        let next = ConnectionStatus {
            connected,
            mode: mode.into(),
        };
        self.status.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    pub fn set_connected(&self, mode: impl Into<String>) -> bool {
        self.set(true, mode)
    }

    pub fn set_disconnected(&self) -> bool {
        self.set(false, NO_MODE)
    }

    pub fn current(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }
}

impl Default for StatusProjection {
    fn default() -> Self {
        Self::new()
    }
}

/// `mode` when non-empty, `fallback` otherwise.
pub(crate) fn mode_or(mode: Option<&str>, fallback: &str) -> String {
    mode.filter(|m| !m.is_empty()).unwrap_or(fallback).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let status = StatusProjection::new().current();
        assert!(!status.connected);
        assert_eq!(status.mode, "-");
    }

    #[test]
    fn last_write_wins() {
        let projection = StatusProjection::new();
        projection.set_connected("serial");
        projection.set(false, "tcp");
        assert_eq!(
            projection.current(),
            ConnectionStatus {
                connected: false,
                mode: "tcp".into()
            }
        );
        projection.set_disconnected();
        assert_eq!(projection.current(), ConnectionStatus::default());
    }

    #[test]
    fn unchanged_write_does_not_notify() {
        let projection = StatusProjection::new();
        let mut rx = projection.subscribe();
        assert!(!projection.set_disconnected());
        assert!(!rx.has_changed().unwrap());
        assert!(projection.set_connected("tcp"));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
    }

    #[test]
    fn mode_fallback_skips_empty() {
        assert_eq!(mode_or(Some("tcp"), "serial"), "tcp");
        assert_eq!(mode_or(Some(""), "serial"), "serial");
        assert_eq!(mode_or(None, "-"), "-");
    }
}
