// ── Command API ──
//
// Every operator action flows through the `Command` enum. The console's
// command processor hands each one to the `CommandDispatcher`, which maps
// it to exactly one backend request.

pub mod input;

use acu_api::models::{AntennaAction, FrameExchange, LinkStatus, LocalOscillatorReadback, SerialPort};

use crate::error::CoreError;

pub use input::{
    LocalOscillatorForm, LocationForm, ManualPositionForm, SatelliteForm, SpeedForm,
};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// A raw frame for `/api/send`.
///
/// `retries` and `timeout` fall back to the console defaults when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SendCommand {
    pub frame_code: String,
    pub data: Vec<String>,
    pub retries: Option<u32>,
    pub timeout: Option<f64>,
    /// Entered through the free-form custom command path.
    pub custom: bool,
}

/// All operator actions against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Link ─────────────────────────────────────────────────────────
    ListPorts,
    ConnectSerial {
        port: String,
    },
    /// `target` is `host:port` as typed.
    ConnectTcp {
        target: String,
    },
    Disconnect,
    Mode,
    Connected,

    // ── Frames ───────────────────────────────────────────────────────
    Send(SendCommand),
    Status,
    GetSatellite,
    GetLocation,
    GetLocalOscillator,

    // ── Antenna configuration ────────────────────────────────────────
    SetSatellite(SatelliteForm),
    SetLocation(LocationForm),
    ManualPosition(ManualPositionForm),
    ManualSpeed(SpeedForm),
    SetLocalOscillator(LocalOscillatorForm),
    /// Lifecycle action on its dedicated endpoint.
    Antenna(AntennaAction),
    /// Lifecycle action through `/api/antenna/action`.
    AntennaAction(AntennaAction),
}

impl Command {
    /// A preset command button: no data, default retries and timeout.
    pub fn send(frame_code: impl Into<String>) -> Self {
        Self::Send(SendCommand {
            frame_code: frame_code.into(),
            data: Vec::new(),
            retries: None,
            timeout: None,
            custom: false,
        })
    }

    /// The free-form custom command: `data` is the comma-separated text
    /// as typed.
    pub fn custom(
        frame_code: impl Into<String>,
        data: &str,
        retries: Option<u32>,
        timeout: Option<f64>,
    ) -> Self {
        Self::Send(SendCommand {
            frame_code: frame_code.into().trim().to_owned(),
            data: input::parse_custom_data(data),
            retries,
            timeout,
            custom: true,
        })
    }

    /// Stop all motion.
    pub fn stop() -> Self {
        Self::send("stop")
    }
}

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Ports(Vec<SerialPort>),
    Link(LinkStatus),
    Exchange(FrameExchange),
    LocalOscillator(LocalOscillatorReadback),
}
