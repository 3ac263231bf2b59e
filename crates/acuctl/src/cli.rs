//! Clap derive structures for the `acuctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// acuctl -- operator console for satellite antenna control units
#[derive(Debug, Parser)]
#[command(
    name = "acuctl",
    version,
    about = "Drive an antenna control unit through its backend",
    long_about = "Send command frames to an antenna control unit (ACU) through its\n\
        HTTP backend and watch the telemetry it streams over WebSocket.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend HTTP root (overrides config)
    #[arg(long, short = 'a', env = "ACU_API", global = true)]
    pub api: Option<String>,

    /// Backend WebSocket root (overrides config)
    #[arg(long, short = 'w', env = "ACU_WS", global = true)]
    pub ws: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long, env = "ACU_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format [default: defaults.output from config, else table]
    #[arg(long, short = 'o', env = "ACU_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: defaults.color from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// HTTP request timeout in seconds (default: wait for the backend)
    #[arg(long, env = "ACU_TIMEOUT", global = true)]
    pub timeout: Option<f64>,
}

impl GlobalOpts {
    /// Output format after config defaults were applied.
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List serial ports the backend can open
    Ports,

    /// Open the link to the ACU
    #[command(alias = "conn")]
    Connect(ConnectArgs),

    /// Close the link to the ACU
    Disconnect,

    /// Show the backend's current link mode
    Mode,

    /// Ask the backend whether the link is open
    Connected,

    /// Send a raw command frame
    Send(SendArgs),

    /// Stop all antenna motion
    Stop,

    /// Request one `$show` status frame
    Status,

    /// Satellite profile
    #[command(alias = "sat")]
    Satellite(SatelliteArgs),

    /// Carrier location
    #[command(alias = "place")]
    Location(LocationArgs),

    /// Manual positioning
    Manual(ManualArgs),

    /// Local oscillator and gain
    Lo(LoArgs),

    /// Antenna lifecycle actions
    #[command(alias = "ant")]
    Antenna(AntennaArgs),

    /// Stream telemetry and the operator log until interrupted
    Monitor(MonitorArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Link ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConnectArgs {
    #[command(subcommand)]
    pub command: ConnectCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConnectCommand {
    /// Connect over a serial port
    Serial {
        /// Port device, e.g. /dev/ttyUSB0 or COM7
        port: String,
    },

    /// Connect over TCP
    Tcp {
        /// Target as host:port
        target: String,
    },
}

// ── Frames ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Frame code, e.g. show or stop
    pub code: String,

    /// Comma-separated data fields
    #[arg(long, short = 'd', default_value = "")]
    pub data: String,

    /// Backend retries for this frame
    #[arg(long)]
    pub retries: Option<u32>,

    /// Backend wait per attempt, seconds
    #[arg(long)]
    pub timeout: Option<f64>,
}

// ── Antenna configuration ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SatelliteArgs {
    #[command(subcommand)]
    pub command: SatelliteCommand,
}

#[derive(Debug, Subcommand)]
pub enum SatelliteCommand {
    /// Read the stored satellite profile
    Get,

    /// Write a satellite profile. Blank numbers default to 0.
    Set {
        /// Profile name
        #[arg(long, default_value = "")]
        name: String,

        /// Center frequency
        #[arg(long, default_value = "")]
        center_freq: String,

        /// Carrier frequency
        #[arg(long, default_value = "")]
        carrier_freq: String,

        /// Carrier symbol rate
        #[arg(long, default_value = "")]
        carrier_rate: String,

        /// Satellite longitude, degrees
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        sat_longitude: String,

        /// Polarization mode (0 or 1)
        #[arg(long, default_value = "")]
        pol_mode: String,

        /// Lock threshold (default 5)
        #[arg(long, default_value = "")]
        lock_threshold: String,
    },
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    #[command(subcommand)]
    pub command: LocationCommand,
}

#[derive(Debug, Subcommand)]
pub enum LocationCommand {
    /// Read the stored carrier location
    Get,

    /// Write the carrier location
    Set {
        /// Longitude, degrees
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        longitude: String,

        /// Latitude, degrees
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        latitude: String,

        /// Heading, degrees (omitted when blank)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        heading: String,
    },
}

#[derive(Debug, Args)]
pub struct ManualArgs {
    #[command(subcommand)]
    pub command: ManualCommand,
}

#[derive(Debug, Subcommand)]
pub enum ManualCommand {
    /// Move to a target position. Blank axis fields are sent as null.
    Dirx {
        /// Motion type: a, e, p or l
        sport_type: String,

        #[arg(long, default_value = "", allow_hyphen_values = true)]
        az_target: String,

        #[arg(long, default_value = "")]
        az_speed: String,

        #[arg(long, default_value = "", allow_hyphen_values = true)]
        pitch_target: String,

        #[arg(long, default_value = "")]
        pitch_speed: String,

        #[arg(long, default_value = "", allow_hyphen_values = true)]
        pol_target: String,

        #[arg(long, default_value = "")]
        pol_speed: String,
    },

    /// Drive one direction at a fixed speed
    Speed {
        /// Direction code, e.g. L or R
        direction_code: String,

        /// Speed, degrees per second
        #[arg(allow_hyphen_values = true)]
        speed: String,
    },
}

#[derive(Debug, Args)]
pub struct LoArgs {
    #[command(subcommand)]
    pub command: LoCommand,
}

#[derive(Debug, Subcommand)]
pub enum LoCommand {
    /// Read both oscillators
    Get,

    /// Set one oscillator
    Set {
        /// beacon or dvb
        #[arg(long, default_value = "beacon")]
        mode: String,

        /// LO frequency, MHz
        #[arg(long, default_value = "")]
        lo_mhz: String,

        /// Gain
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        gain: String,
    },
}

#[derive(Debug, Args)]
pub struct AntennaArgs {
    #[command(subcommand)]
    pub command: AntennaCommand,
}

#[derive(Debug, Subcommand)]
pub enum AntennaCommand {
    /// Reset the controller
    Reset,

    /// Start the star alignment search
    #[command(alias = "search")]
    AlignStar,

    /// Move to the stow (collection) position
    #[command(alias = "collection")]
    Stow,

    /// Run a lifecycle action through the unified endpoint
    Action {
        /// reset, align_star, collection or stop
        name: String,
    },
}

// ── Monitor ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Ignore status-channel messages (other channels keep running)
    #[arg(long)]
    pub no_stream: bool,

    /// Seconds between metric table refreshes
    #[arg(long, short = 'i', default_value = "5")]
    pub interval: u64,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
