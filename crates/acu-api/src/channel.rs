//! Telemetry channel with fixed-delay auto-reconnect.
//!
//! Each [`ChannelConnection`] owns one background task that connects to a
//! backend WebSocket endpoint, decodes every text frame as JSON into the
//! channel's payload type, and delivers [`ChannelEvent`]s in arrival order
//! to a single consumer. Any close or transport error schedules a fresh
//! connection after the channel's fixed reconnect delay, forever, until
//! the channel's [`CancellationToken`] fires.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use acu_api::channel::{ChannelConfig, ChannelConnection, ChannelEvent};
//! use acu_api::models::StatusMessage;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ChannelConfig::new("status", "ws://127.0.0.1:8000/ws/show".parse()?, Duration::from_millis(1500));
//! let (channel, mut events) = ChannelConnection::start::<StatusMessage>(config, CancellationToken::new());
//!
//! while let Some(event) = events.recv().await {
//!     if let ChannelEvent::Message(msg) = event {
//!         println!("connected={:?}", msg.connected);
//!     }
//! }
//!
//! channel.shutdown();
//! ```

use std::time::Duration;

use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::error::Error;

// ── ChannelConfig ────────────────────────────────────────────────────

/// Where a channel connects and how long it waits between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Short channel name used in logs (`status`, `satellite`, ...).
    pub name: String,
    /// Full WebSocket URL, e.g. `ws://127.0.0.1:8000/ws/show`.
    pub url: Url,
    /// Constant delay before every reconnect attempt. No backoff.
    pub reconnect_delay: Duration,
}

impl ChannelConfig {
    pub fn new(name: impl Into<String>, url: Url, reconnect_delay: Duration) -> Self {
        Self {
            name: name.into(),
            url,
            reconnect_delay,
        }
    }
}

// ── ChannelState ─────────────────────────────────────────────────────

/// Observable lifecycle state of one channel.
///
/// The socket itself never leaves the background task: every attempt
/// opens a brand-new connection and drops it when the attempt ends, so a
/// channel holds at most one live socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelState {
    pub name: String,
    pub is_open: bool,
    pub reconnect_delay: Duration,
    pub last_error: Option<String>,
    /// Connection attempts made so far, successful or not.
    pub connect_attempts: u64,
    /// Attempts that reached an open socket.
    pub connections: u64,
}

impl ChannelState {
    fn new(config: &ChannelConfig) -> Self {
        Self {
            name: config.name.clone(),
            is_open: false,
            reconnect_delay: config.reconnect_delay,
            last_error: None,
            connect_attempts: 0,
            connections: 0,
        }
    }
}

// ── ChannelEvent ─────────────────────────────────────────────────────

/// Everything a channel reports to its consumer, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent<T> {
    /// A new socket is open.
    Opened,
    /// A decoded payload.
    Message(T),
    /// A frame that did not decode; the connection stays up.
    Malformed(String),
    /// The socket closed or failed; a reconnect is scheduled.
    Closed(String),
}

// ── ChannelConnection ────────────────────────────────────────────────

/// Handle to a running channel task.
pub struct ChannelConnection {
    name: String,
    state_rx: watch::Receiver<ChannelState>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ChannelConnection {
    /// Spawn the channel task and return its handle plus the event queue.
    ///
    /// Returns immediately; the first connection attempt happens on the
    /// background task. Must be called from within a tokio runtime.
    pub fn start<T>(
        config: ChannelConfig,
        cancel: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<ChannelEvent<T>>)
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ChannelState::new(&config));
        let name = config.name.clone();

        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            channel_loop(config, state_tx, event_tx, task_cancel).await;
        });

        let handle = Self {
            name,
            state_rx,
            cancel,
            task,
        };
        (handle, event_rx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChannelState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to lifecycle state changes.
    pub fn watch_state(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }

    /// Cancel the connection and any pending reconnect.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Cancel and wait for the background task to exit.
    pub async fn join(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(channel = %self.name, error = %e, "channel task panicked");
        }
    }
}

// ── Background reconnection loop ─────────────────────────────────────

/// Main loop: connect → read → on close or error, wait → reconnect.
async fn channel_loop<T: DeserializeOwned>(
    config: ChannelConfig,
    state_tx: watch::Sender<ChannelState>,
    event_tx: mpsc::UnboundedSender<ChannelEvent<T>>,
    cancel: CancellationToken,
) {
    loop {
        state_tx.send_modify(|s| s.connect_attempts += 1);

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = connect_and_read(&config, &state_tx, &event_tx) => result,
        };

        // Errors and clean closes take the same path.
        let reason = match outcome {
            Ok(reason) => {
                info!(channel = %config.name, %reason, "channel closed");
                reason
            }
            Err(e) => {
                warn!(channel = %config.name, error = %e, "channel error");
                e.to_string()
            }
        };

        state_tx.send_modify(|s| {
            s.is_open = false;
            s.last_error = Some(reason.clone());
        });

        if event_tx.send(ChannelEvent::Closed(reason)).is_err() {
            debug!(channel = %config.name, "channel consumer gone, stopping");
            break;
        }

        debug!(
            channel = %config.name,
            delay_ms = u64::try_from(config.reconnect_delay.as_millis()).unwrap_or(u64::MAX),
            "waiting before reconnect"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(config.reconnect_delay) => {}
        }
    }

    state_tx.send_modify(|s| s.is_open = false);
    debug!(channel = %config.name, "channel loop exiting");
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Open one socket and read until it drops.
///
/// Returns `Ok(reason)` for an orderly close and `Err` for a failed
/// handshake or a transport error mid-stream.
async fn connect_and_read<T: DeserializeOwned>(
    config: &ChannelConfig,
    state_tx: &watch::Sender<ChannelState>,
    event_tx: &mpsc::UnboundedSender<ChannelEvent<T>>,
) -> Result<String, Error> {
    debug!(channel = %config.name, url = %config.url, "connecting channel");

    let (mut ws_stream, _response) = tokio_tungstenite::connect_async(config.url.as_str())
        .await
        .map_err(|e| Error::WebSocketConnect(e.to_string()))?;

    info!(channel = %config.name, "channel connected");
    state_tx.send_modify(|s| {
        s.is_open = true;
        s.last_error = None;
        s.connections += 1;
    });
    let _ = event_tx.send(ChannelEvent::Opened);

    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(tungstenite::Message::Text(text)) => {
                let _ = event_tx.send(decode(&config.name, text.as_bytes()));
            }
            Ok(tungstenite::Message::Binary(bytes)) => {
                let _ = event_tx.send(decode(&config.name, &bytes));
            }
            Ok(tungstenite::Message::Close(frame)) => {
                return Ok(match frame {
                    Some(cf) => format!("close frame (code {}): {}", cf.code, cf.reason.as_str()),
                    None => "close frame".into(),
                });
            }
            Ok(_) => {
                // Ping/Pong/raw frames; tungstenite answers pings itself.
                trace!(channel = %config.name, "control frame");
            }
            Err(e) => return Err(Error::WebSocketConnect(e.to_string())),
        }
    }

    Ok("stream ended".into())
}

// ── Message decoding ─────────────────────────────────────────────────

fn decode<T: DeserializeOwned>(channel: &str, bytes: &[u8]) -> ChannelEvent<T> {
    match serde_json::from_slice(bytes) {
        Ok(payload) => ChannelEvent::Message(payload),
        Err(e) => {
            debug!(channel, error = %e, "failed to decode channel payload");
            ChannelEvent::Malformed(e.to_string())
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
