// acu-api: transport layer for the ACU web controller backend.
//
// Two surfaces: the HTTP command endpoint (`AcuClient`) and the
// WebSocket telemetry channels (`ChannelConnection`).

pub mod channel;
pub mod error;
pub mod http;
pub mod models;
pub mod transport;

pub use channel::{ChannelConfig, ChannelConnection, ChannelEvent, ChannelState};
pub use error::Error;
pub use http::AcuClient;
pub use transport::TransportConfig;
