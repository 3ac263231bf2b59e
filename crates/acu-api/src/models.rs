// Wire types for the ACU backend
//
// Request bodies mirror the backend's pydantic models field-for-field.
// Response and stream payload types are lenient: every optional field
// defaults, and unknown fields are ignored, so a newer backend never
// breaks an older console.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A partial telemetry snapshot as produced by the backend's `$show`
/// parser. Keys are metric names (plus bookkeeping keys such as `raw` and
/// `frame_code`); values are strings or `null`.
pub type Snapshot = serde_json::Map<String, serde_json::Value>;

// ── Link management ─────────────────────────────────────────────────

/// A serial port the backend can open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialPort {
    pub device: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PortsResponse {
    #[serde(default)]
    pub ports: Vec<SerialPort>,
}

/// `POST /api/connect_serial`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectSerialRequest {
    pub port: String,
    pub baudrate: u32,
    pub timeout: f64,
}

/// `POST /api/connect_tcp`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectTcpRequest {
    pub host: String,
    pub port: u16,
    pub timeout: f64,
}

/// Link state reported by connect/disconnect/mode/connected endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    #[serde(default)]
    pub connected: Option<bool>,
    #[serde(default)]
    pub mode: Option<String>,
}

// ── Frame exchange ──────────────────────────────────────────────────

/// `POST /api/send`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendRequest {
    pub frame_type: String,
    pub frame_code: String,
    pub data: Vec<String>,
    pub retries: u32,
    pub timeout: f64,
}

/// One request/response exchange with the antenna, echoed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameExchange {
    /// The frame the backend transmitted, CR/LF stripped.
    #[serde(default)]
    pub frame: String,
    /// The antenna's reply line.
    #[serde(default)]
    pub response: String,
    /// Parsed `$show` telemetry, when the endpoint parses the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<Snapshot>,
}

/// `GET /api/lo/get` returns one exchange per oscillator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalOscillatorReadback {
    #[serde(default)]
    pub beacon: FrameExchange,
    #[serde(default)]
    pub dvb: FrameExchange,
}

// ── Antenna configuration ───────────────────────────────────────────

/// `POST /api/satellite/set`; field order follows the protocol table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteProfileRequest {
    pub name: String,
    pub center_freq: f64,
    pub carrier_freq: f64,
    pub carrier_rate: f64,
    pub sat_longitude: f64,
    /// 0 = horizontal, 1 = vertical.
    pub pol_mode: u8,
    pub lock_threshold: f64,
}

/// `POST /api/location/set`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRequest {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

/// `POST /api/manual/dirx`
///
/// Every axis field serializes as `null` when unset so the backend can
/// tell "hold this axis" apart from "drive to zero".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualPositionRequest {
    pub sport_type: String,
    pub az_target: Option<f64>,
    pub az_speed: Option<f64>,
    pub pitch_target: Option<f64>,
    pub pitch_speed: Option<f64>,
    pub pol_target: Option<f64>,
    pub pol_speed: Option<f64>,
}

/// `POST /api/manual/speed`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualSpeedRequest {
    pub direction_code: String,
    pub speed: f64,
}

/// Which local oscillator a `lo/set` targets.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LoMode {
    #[default]
    Beacon,
    Dvb,
}

/// `POST /api/lo/set`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalOscillatorRequest {
    pub mode: LoMode,
    pub lo_mhz: f64,
    pub gain: f64,
}

/// Antenna lifecycle actions accepted by `POST /api/antenna/action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AntennaAction {
    Reset,
    #[strum(to_string = "align_star", serialize = "star", serialize = "search_star")]
    AlignStar,
    #[strum(to_string = "collection", serialize = "stow", serialize = "stow_collection")]
    Collection,
    Stop,
}

#[derive(Debug, Serialize)]
pub(crate) struct AntennaActionRequest {
    pub action: AntennaAction,
}

// ── Stream payloads ─────────────────────────────────────────────────

/// Payload of the primary status channel (`/ws/show`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub connected: Option<bool>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub frame: Option<String>,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub parsed: Option<Snapshot>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Payload of the satellite (`/ws/sat`) and location (`/ws/location`)
/// channels.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFeedMessage {
    #[serde(default)]
    pub connected: Option<bool>,
    #[serde(default)]
    pub frame: Option<String>,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One oscillator's half of a `/ws/lo` message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoFeedPart {
    #[serde(default)]
    pub frame: Option<String>,
    #[serde(default)]
    pub raw: Option<String>,
}

/// Payload of the local-oscillator channel (`/ws/lo`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoFeedMessage {
    #[serde(default)]
    pub connected: Option<bool>,
    #[serde(default)]
    pub beacon: Option<LoFeedPart>,
    #[serde(default)]
    pub dvb: Option<LoFeedPart>,
    #[serde(default)]
    pub error: Option<String>,
}
