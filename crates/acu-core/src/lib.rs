// acu-core: channel synchronization and command dispatch between acu-api
// and front ends (CLI).

pub mod command;
pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{
    Command, CommandResult, LocalOscillatorForm, LocationForm, ManualPositionForm,
    SatelliteForm, SendCommand, SpeedForm,
};
pub use config::{ChannelKind, ChannelSettings, ChannelsConfig, CommandDefaults, ConsoleConfig};
pub use console::Console;
pub use dispatcher::CommandDispatcher;
pub use error::CoreError;
pub use registry::ChannelRegistry;
pub use store::{
    ConnectionStatus, ConsoleState, FeedTexts, LogEntry, MetricKey, MetricValue, MetricsTable,
    OperatorLog,
};

// Wire types front ends need without depending on acu-api directly.
pub use acu_api::ChannelState;
pub use acu_api::models::{
    AntennaAction, FrameExchange, LinkStatus, LoMode, LocalOscillatorReadback, SerialPort,
};
