// ── Channel registry ──
//
// Owns the four telemetry channels. Each enabled channel gets its own
// connection task plus one consumer task that applies that channel's
// events to the console state in arrival order. Channels never wait on
// each other.

use std::sync::Arc;

use acu_api::models::{LoFeedMessage, RawFeedMessage, StatusMessage};
use acu_api::{ChannelConfig, ChannelConnection, ChannelEvent, ChannelState};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{ChannelKind, ConsoleConfig};
use crate::error::CoreError;
use crate::store::{ConsoleState, NO_MODE, mode_or};

/// Mode reported while streaming when the backend does not name one.
const STREAM_MODE: &str = "serial/tcp";

// ── Payload handlers ─────────────────────────────────────────────────

/// A channel payload that knows how to apply itself to the console.
pub(crate) trait ChannelPayload: DeserializeOwned + Send + 'static {
    fn apply(self, kind: ChannelKind, state: &ConsoleState);
}

impl ChannelPayload for StatusMessage {
    fn apply(self, kind: ChannelKind, state: &ConsoleState) {
        if self.connected == Some(false) {
            state
                .status()
                .set(false, mode_or(self.mode.as_deref(), NO_MODE));
            return;
        }

        state
            .status()
            .set_connected(mode_or(self.mode.as_deref(), STREAM_MODE));

        if let Some(parsed) = &self.parsed {
            state.metrics().apply_snapshot(parsed);
            let raw = parsed
                .get("raw")
                .and_then(serde_json::Value::as_str)
                .filter(|s| !s.is_empty())
                .or_else(|| self.raw.as_deref().filter(|s| !s.is_empty()));
            if let Some(raw) = raw {
                state.log().append(format!("[WS][{}] {raw}", kind.tag()));
            }
        }

        log_stream_error(kind, state, self.error.as_deref());
    }
}

impl ChannelPayload for RawFeedMessage {
    fn apply(self, kind: ChannelKind, state: &ConsoleState) {
        if self.connected == Some(false) {
            return;
        }

        if let Some(raw) = self.raw.as_deref().filter(|s| !s.is_empty()) {
            match kind {
                ChannelKind::Satellite => state.feeds().set_satellite(raw),
                ChannelKind::Location => state.feeds().set_location(raw),
                ChannelKind::Status | ChannelKind::LocalOscillator => {
                    warn!(channel = %kind, "raw feed on unexpected channel");
                    return;
                }
            }
            state.log().append(format!("[WS][{}] {raw}", kind.tag()));
        }

        log_stream_error(kind, state, self.error.as_deref());
    }
}

impl ChannelPayload for LoFeedMessage {
    fn apply(self, kind: ChannelKind, state: &ConsoleState) {
        if self.connected == Some(false) {
            return;
        }

        let beacon = self
            .beacon
            .as_ref()
            .and_then(|p| p.raw.as_deref())
            .filter(|s| !s.is_empty());
        let dvb = self
            .dvb
            .as_ref()
            .and_then(|p| p.raw.as_deref())
            .filter(|s| !s.is_empty());

        if beacon.is_some() || dvb.is_some() {
            state.feeds().set_local_oscillator(beacon, dvb);
            state.log().append(format!(
                "[WS][{}] beacon={} dvb={}",
                kind.tag(),
                beacon.unwrap_or("-"),
                dvb.unwrap_or("-")
            ));
        }

        log_stream_error(kind, state, self.error.as_deref());
    }
}

fn log_stream_error(kind: ChannelKind, state: &ConsoleState, error: Option<&str>) {
    if let Some(error) = error.filter(|e| !e.is_empty()) {
        state
            .log()
            .append(format!("[WS][{}][ERR] {error}", kind.tag()));
    }
}

/// Apply one channel event to the console state.
pub(crate) fn handle_event<T: ChannelPayload>(
    kind: ChannelKind,
    state: &ConsoleState,
    event: ChannelEvent<T>,
) {
    match event {
        ChannelEvent::Opened => {
            state
                .log()
                .append(format!("WS {} connected.", kind.path()));
        }
        ChannelEvent::Closed(reason) => {
            debug!(channel = %kind, %reason, "channel closed");
            state
                .log()
                .append(format!("WS {} closed. retrying...", kind.path()));
        }
        // A paused status stream drops everything it receives.
        ChannelEvent::Message(_) | ChannelEvent::Malformed(_)
            if kind == ChannelKind::Status && !state.is_streaming() => {}
        ChannelEvent::Message(payload) => payload.apply(kind, state),
        ChannelEvent::Malformed(reason) => {
            state
                .log()
                .append(format!("WS {} parse error: {reason}", kind.log_name()));
        }
    }
}

// ── ChannelRegistry ──────────────────────────────────────────────────

/// Handle to every running channel.
pub struct ChannelRegistry {
    channels: Vec<(ChannelKind, ChannelConnection)>,
    consumers: Vec<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl ChannelRegistry {
    /// Start every enabled channel. Must be called from within a tokio
    /// runtime; returns as soon as the tasks are spawned.
    pub fn start_all(
        config: &ConsoleConfig,
        state: Arc<ConsoleState>,
        cancel: CancellationToken,
    ) -> Result<Self, CoreError> {
        let mut registry = Self {
            channels: Vec::new(),
            consumers: Vec::new(),
            cancel,
        };

        for kind in config.channels.enabled() {
            let url = config.channel_url(kind).map_err(|e| CoreError::Config {
                message: format!("Invalid WebSocket URL for {kind} channel: {e}"),
            })?;
            let channel_config = ChannelConfig::new(
                kind.to_string(),
                url,
                config.channels.get(kind).reconnect_delay,
            );

            match kind {
                ChannelKind::Status => {
                    registry.spawn::<StatusMessage>(kind, channel_config, Arc::clone(&state));
                }
                ChannelKind::Satellite | ChannelKind::Location => {
                    registry.spawn::<RawFeedMessage>(kind, channel_config, Arc::clone(&state));
                }
                ChannelKind::LocalOscillator => {
                    registry.spawn::<LoFeedMessage>(kind, channel_config, Arc::clone(&state));
                }
            }
        }

        info!(channels = registry.channels.len(), "channel registry started");
        Ok(registry)
    }

    fn spawn<T: ChannelPayload>(
        &mut self,
        kind: ChannelKind,
        config: ChannelConfig,
        state: Arc<ConsoleState>,
    ) {
        let (connection, mut events) =
            ChannelConnection::start::<T>(config, self.cancel.child_token());

        let consumer = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                handle_event(kind, &state, event);
            }
            debug!(channel = %kind, "channel consumer exiting");
        });

        self.channels.push((kind, connection));
        self.consumers.push(consumer);
    }

    /// Lifecycle state of every running channel, in start order.
    pub fn states(&self) -> Vec<(ChannelKind, ChannelState)> {
        self.channels
            .iter()
            .map(|(kind, connection)| (*kind, connection.state()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Cancel every connection and pending reconnect.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Cancel and wait for every channel and consumer task to exit.
    pub async fn join(self) {
        self.cancel.cancel();
        for (_, connection) in self.channels {
            connection.join().await;
        }
        for consumer in self.consumers {
            if let Err(e) = consumer.await {
                warn!(error = %e, "channel consumer panicked");
            }
        }
    }
}
