// ── Command dispatch ──
//
// One command, one backend request. Each outcome lands in the operator
// log, parsed telemetry from the reply is merged into the metrics table,
// and link commands update the connection status.

use std::future::Future;
use std::sync::Arc;

use acu_api::AcuClient;
use acu_api::models::{
    AntennaAction, ConnectSerialRequest, ConnectTcpRequest, FrameExchange, SendRequest,
};
use tracing::{debug, warn};

use crate::command::{Command, CommandResult, SendCommand, input};
use crate::config::CommandDefaults;
use crate::error::CoreError;
use crate::store::{ConsoleState, NO_MODE, mode_or};

/// Frame type of every operator command frame.
const FRAME_TYPE: &str = "cmd";

/// Executes commands against the backend and records their outcome.
#[derive(Clone)]
pub struct CommandDispatcher {
    client: AcuClient,
    state: Arc<ConsoleState>,
    defaults: CommandDefaults,
}

impl CommandDispatcher {
    pub fn new(client: AcuClient, state: Arc<ConsoleState>, defaults: CommandDefaults) -> Self {
        Self {
            client,
            state,
            defaults,
        }
    }

    pub fn state(&self) -> &Arc<ConsoleState> {
        &self.state
    }

    /// Run one command.
    ///
    /// Validation failures are logged and returned without touching the
    /// network. Everything else issues exactly one request; the backend
    /// owns retries.
    pub async fn dispatch(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        debug!(?cmd, "dispatching command");
        let result = self.route(cmd).await;
        if let Err(CoreError::ValidationFailed { ref message }) = result {
            self.log(message.clone());
        }
        result
    }

    async fn route(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            // ── Link ─────────────────────────────────────────────────
            Command::ListPorts => match self.client.list_ports().await {
                Ok(ports) => {
                    self.log("Ports refreshed.");
                    Ok(CommandResult::Ports(ports))
                }
                Err(e) => Err(self.fail("ports", e)),
            },

            Command::ConnectSerial { port } => self.connect_serial(port).await,
            Command::ConnectTcp { target } => self.connect_tcp(&target).await,

            Command::Disconnect => match self.client.disconnect().await {
                Ok(link) => {
                    self.state.status().set_disconnected();
                    self.log("Disconnected.");
                    Ok(CommandResult::Link(link))
                }
                Err(e) => Err(self.fail("disconnect", e)),
            },

            Command::Mode => match self.client.mode().await {
                Ok(link) => {
                    self.log(format!("Mode: {}", link.mode.as_deref().unwrap_or(NO_MODE)));
                    Ok(CommandResult::Link(link))
                }
                Err(e) => Err(self.fail("mode", e)),
            },

            Command::Connected => match self.client.connected().await {
                Ok(link) => {
                    self.log(format!(
                        "Connected: {} (mode: {})",
                        link.connected.unwrap_or(false),
                        link.mode.as_deref().unwrap_or(NO_MODE)
                    ));
                    Ok(CommandResult::Link(link))
                }
                Err(e) => Err(self.fail("connected", e)),
            },

            // ── Frames ───────────────────────────────────────────────
            Command::Send(send) => self.send(send).await,

            Command::Status => {
                self.exchange(Some("STATUS"), "status", self.client.status())
                    .await
            }
            Command::GetSatellite => {
                self.exchange(Some("SAT GET"), "sat get", self.client.get_satellite())
                    .await
            }
            Command::GetLocation => {
                self.exchange(Some("PLACE GET"), "place get", self.client.get_location())
                    .await
            }

            Command::GetLocalOscillator => match self.client.get_local_oscillator().await {
                Ok(readback) => {
                    self.log_exchange(Some("LO GET BEACON"), &readback.beacon);
                    self.log_exchange(Some("LO GET DVB"), &readback.dvb);
                    Ok(CommandResult::LocalOscillator(readback))
                }
                Err(e) => Err(self.fail("lo get", e)),
            },

            // ── Antenna configuration ────────────────────────────────
            Command::SetSatellite(form) => {
                let req = form.to_request()?;
                self.exchange(Some("SAT SET"), "sat set", self.client.set_satellite(&req))
                    .await
            }
            Command::SetLocation(form) => {
                let req = form.to_request()?;
                self.exchange(Some("PLACE SET"), "place set", self.client.set_location(&req))
                    .await
            }
            Command::ManualPosition(form) => {
                let req = form.to_request()?;
                self.exchange(Some("DIRX"), "manual dirx", self.client.manual_position(&req))
                    .await
            }
            Command::ManualSpeed(form) => {
                let req = form.to_request()?;
                self.exchange(
                    Some("MANUAL SPEED"),
                    "manual speed-only",
                    self.client.manual_speed(&req),
                )
                .await
            }
            Command::SetLocalOscillator(form) => {
                let req = form.to_request()?;
                self.exchange(Some("LO SET"), "lo set", self.client.set_local_oscillator(&req))
                    .await
            }

            Command::Antenna(action) => {
                let (label, prefix) = antenna_labels(action);
                self.exchange(Some(label), prefix, self.client.antenna(action))
                    .await
            }
            Command::AntennaAction(action) => {
                let (label, _) = antenna_labels(action);
                self.exchange(
                    Some(label),
                    "antenna action",
                    self.client.antenna_action(action),
                )
                .await
            }
        }
    }

    // ── Link commands ────────────────────────────────────────────────

    async fn connect_serial(&self, port: String) -> Result<CommandResult, CoreError> {
        let port = port.trim().to_owned();
        if port.is_empty() {
            return Err(CoreError::validation("Pick a serial port first."));
        }

        let req = ConnectSerialRequest {
            port,
            baudrate: self.defaults.serial_baudrate,
            timeout: self.defaults.serial_timeout,
        };
        match self.client.connect_serial(&req).await {
            Ok(link) => {
                self.state
                    .status()
                    .set_connected(mode_or(link.mode.as_deref(), "serial"));
                self.log(format!("Serial connected: {}", req.port));
                Ok(CommandResult::Link(link))
            }
            Err(e) => {
                self.state.status().set_disconnected();
                Err(self.fail("connect serial", e))
            }
        }
    }

    async fn connect_tcp(&self, target: &str) -> Result<CommandResult, CoreError> {
        let (host, port) = input::parse_tcp_target(target)?;

        let req = ConnectTcpRequest {
            host,
            port,
            timeout: self.defaults.tcp_timeout,
        };
        match self.client.connect_tcp(&req).await {
            Ok(link) => {
                self.state
                    .status()
                    .set_connected(mode_or(link.mode.as_deref(), "tcp"));
                self.log(format!("TCP connected: {}:{}", req.host, req.port));
                Ok(CommandResult::Link(link))
            }
            Err(e) => {
                self.state.status().set_disconnected();
                Err(self.fail("connect tcp", e))
            }
        }
    }

    // ── Frame commands ───────────────────────────────────────────────

    async fn send(&self, send: SendCommand) -> Result<CommandResult, CoreError> {
        let frame_code = send.frame_code.trim();
        if frame_code.is_empty() {
            let message = if send.custom {
                "Custom frame_code empty."
            } else {
                "Frame code empty."
            };
            return Err(CoreError::validation(message));
        }

        let req = SendRequest {
            frame_type: FRAME_TYPE.into(),
            frame_code: frame_code.to_owned(),
            data: send.data,
            retries: send.retries.unwrap_or(self.defaults.retries),
            timeout: send.timeout.unwrap_or(self.defaults.timeout),
        };
        let prefix = if send.custom { "custom send" } else { "send" };
        self.exchange(None, prefix, self.client.send(&req)).await
    }

    /// Await one frame exchange, then log it and merge its telemetry.
    async fn exchange(
        &self,
        label: Option<&str>,
        error_prefix: &str,
        request: impl Future<Output = Result<FrameExchange, acu_api::Error>>,
    ) -> Result<CommandResult, CoreError> {
        match request.await {
            Ok(exchange) => {
                self.log_exchange(label, &exchange);
                if let Some(parsed) = &exchange.parsed {
                    self.state.metrics().apply_snapshot(parsed);
                }
                Ok(CommandResult::Exchange(exchange))
            }
            Err(e) => Err(self.fail(error_prefix, e)),
        }
    }

    // ── Logging ──────────────────────────────────────────────────────

    fn log(&self, line: impl Into<String>) {
        self.state.log().append(line);
    }

    fn log_exchange(&self, label: Option<&str>, exchange: &FrameExchange) {
        match label {
            Some(label) => {
                self.log(format!("[TX][{label}] {}", exchange.frame));
                self.log(format!("[RX][{label}] {}", exchange.response));
            }
            None => {
                self.log(format!("[TX] {}", exchange.frame));
                self.log(format!("[RX] {}", exchange.response));
            }
        }
    }

    /// Log a backend failure once and convert it.
    fn fail(&self, prefix: &str, err: acu_api::Error) -> CoreError {
        warn!(command = prefix, error = %err, "command failed");
        self.log(format!("ERROR {prefix}: {err}"));
        err.into()
    }
}

/// Log label and error prefix for each lifecycle action.
fn antenna_labels(action: AntennaAction) -> (&'static str, &'static str) {
    match action {
        AntennaAction::Reset => ("RESET", "reset"),
        AntennaAction::AlignStar => ("SEARCH", "search"),
        AntennaAction::Collection => ("STOW", "stow"),
        AntennaAction::Stop => ("STOP", "stop"),
    }
}
