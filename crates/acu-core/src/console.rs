// ── Console ──
//
// Lifecycle for one backend: starts the command processor and the
// channel registry, routes commands to the dispatcher one at a time, and
// exposes the shared state to whichever front end is attached.

use std::sync::Arc;

use acu_api::transport::TransportConfig;
use acu_api::{AcuClient, ChannelState};
use tokio::sync::{Mutex, broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{ChannelKind, ConsoleConfig};
use crate::dispatcher::CommandDispatcher;
use crate::error::CoreError;
use crate::registry::ChannelRegistry;
use crate::store::{
    ConnectionStatus, ConsoleState, FeedTexts, LogEntry, MetricsTable, OperatorLog,
};

const COMMAND_CHANNEL_SIZE: usize = 64;

/// The main entry point for front ends.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. Nothing runs until
/// [`start()`](Self::start) is called.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    state: Arc<ConsoleState>,
    dispatcher: CommandDispatcher,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    registry: Mutex<Option<ChannelRegistry>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Console {
    /// Build a console for `config`. Does not touch the network.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = AcuClient::new(config.api_base.clone(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Build a console around an existing client.
    pub fn with_client(config: ConsoleConfig, client: AcuClient) -> Self {
        let state = Arc::new(ConsoleState::new());
        let dispatcher =
            CommandDispatcher::new(client, Arc::clone(&state), config.defaults.clone());
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Self {
            inner: Arc::new(ConsoleInner {
                config,
                state,
                dispatcher,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                registry: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn state(&self) -> &Arc<ConsoleState> {
        &self.inner.state
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the command processor and start every enabled channel.
    ///
    /// Channels connect in the background; this returns without waiting
    /// for any of them. Calling it twice is a no-op.
    pub async fn start(&self) -> Result<(), CoreError> {
        let Some(rx) = self.inner.command_rx.lock().await.take() else {
            debug!("console already started");
            return Ok(());
        };

        let dispatcher = self.inner.dispatcher.clone();
        let cancel = self.inner.cancel.clone();
        self.inner
            .task_handles
            .lock()
            .await
            .push(tokio::spawn(command_processor_task(dispatcher, rx, cancel)));

        if self.inner.config.channels.enabled().next().is_some() {
            let registry = ChannelRegistry::start_all(
                &self.inner.config,
                Arc::clone(&self.inner.state),
                self.inner.cancel.child_token(),
            )?;
            *self.inner.registry.lock().await = Some(registry);
        }

        info!(api = %self.inner.config.api_base, "console started");
        Ok(())
    }

    /// Stop every channel and the command processor, and wait for them.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        if let Some(registry) = self.inner.registry.lock().await.take() {
            registry.join().await;
        }

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "console task panicked");
            }
        }
        debug!("console stopped");
    }

    /// One-shot: start without channels, run closure, shut down.
    ///
    /// For CLI commands that need a single request/response cycle.
    pub async fn oneshot<F, Fut, T>(config: ConsoleConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Console) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.channels.disable_all();

        let console = Console::new(cfg)?;
        console.start().await?;
        let result = f(console.clone()).await;
        console.shutdown().await;
        result
    }

    // ── Command execution ────────────────────────────────────────────

    /// Execute a command.
    ///
    /// Commands run one at a time in submission order; each one's
    /// request, log lines and telemetry merge finish before the next
    /// begins.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if self.inner.cancel.is_cancelled() || self.inner.command_rx.lock().await.is_some() {
            return Err(CoreError::ConsoleStopped);
        }

        let (tx, rx) = oneshot::channel();
        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::ConsoleStopped)?;

        rx.await.map_err(|_| CoreError::ConsoleStopped)?
    }

    // ── State observation ────────────────────────────────────────────

    pub fn metrics(&self) -> MetricsTable {
        self.inner.state.metrics().snapshot()
    }

    pub fn watch_metrics(&self) -> watch::Receiver<MetricsTable> {
        self.inner.state.metrics().subscribe()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.inner.state.status().current()
    }

    pub fn watch_connection_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.inner.state.status().subscribe()
    }

    pub fn feeds(&self) -> FeedTexts {
        self.inner.state.feeds().current()
    }

    pub fn log(&self) -> &OperatorLog {
        self.inner.state.log()
    }

    /// Subscribe to new operator log entries.
    pub fn log_entries(&self) -> broadcast::Receiver<Arc<LogEntry>> {
        self.inner.state.log().subscribe()
    }

    /// Lifecycle state of every running channel.
    pub async fn channel_states(&self) -> Vec<(ChannelKind, ChannelState)> {
        self.inner
            .registry
            .lock()
            .await
            .as_ref()
            .map(ChannelRegistry::states)
            .unwrap_or_default()
    }

    /// Pause or resume applying status-channel messages.
    pub fn set_streaming(&self, enabled: bool) {
        self.inner.state.set_streaming(enabled);
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Process commands from the mpsc channel one at a time.
async fn command_processor_task(
    dispatcher: CommandDispatcher,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = dispatcher.dispatch(envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
    debug!("command processor exiting");
}
