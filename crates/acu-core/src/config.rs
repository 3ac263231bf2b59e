// ── Runtime console configuration ──
//
// Describes *where* the backend lives and how the console talks to it.
// Never touches disk: acu-config (or a test) builds a `ConsoleConfig`
// and hands it to `Console`.

use std::time::Duration;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use url::Url;

// ── ChannelKind ──────────────────────────────────────────────────────

/// The four telemetry channels the backend streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ChannelKind {
    /// Live `$show` status (`/ws/show`).
    #[strum(to_string = "status", serialize = "show")]
    Status,
    #[strum(to_string = "satellite", serialize = "sat")]
    Satellite,
    #[strum(to_string = "location", serialize = "place")]
    Location,
    #[strum(to_string = "lo", serialize = "local_oscillator")]
    LocalOscillator,
}

impl ChannelKind {
    /// Endpoint path under the WebSocket base.
    pub fn path(self) -> &'static str {
        match self {
            Self::Status => "/ws/show",
            Self::Satellite => "/ws/sat",
            Self::Location => "/ws/location",
            Self::LocalOscillator => "/ws/lo",
        }
    }

    /// Short name used in parse-error log lines.
    pub fn log_name(self) -> &'static str {
        match self {
            Self::Status => "show",
            Self::Satellite => "sat",
            Self::Location => "place",
            Self::LocalOscillator => "lo",
        }
    }

    /// Bracketed tag used in `[WS][<TAG>]` log lines.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Status => "SHOW",
            Self::Satellite => "SAT",
            Self::Location => "PLACE",
            Self::LocalOscillator => "LO",
        }
    }

    pub fn default_reconnect_delay(self) -> Duration {
        match self {
            Self::Status => Duration::from_millis(1500),
            Self::Satellite | Self::Location | Self::LocalOscillator => {
                Duration::from_millis(2000)
            }
        }
    }
}

// ── Channel settings ─────────────────────────────────────────────────

/// Per-channel tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSettings {
    /// Disabled channels are never started.
    pub enabled: bool,
    pub reconnect_delay: Duration,
}

impl ChannelSettings {
    pub fn for_kind(kind: ChannelKind) -> Self {
        Self {
            enabled: true,
            reconnect_delay: kind.default_reconnect_delay(),
        }
    }
}

/// Settings for all four channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelsConfig {
    pub status: ChannelSettings,
    pub satellite: ChannelSettings,
    pub location: ChannelSettings,
    pub local_oscillator: ChannelSettings,
}

impl ChannelsConfig {
    pub fn get(&self, kind: ChannelKind) -> ChannelSettings {
        match kind {
            ChannelKind::Status => self.status,
            ChannelKind::Satellite => self.satellite,
            ChannelKind::Location => self.location,
            ChannelKind::LocalOscillator => self.local_oscillator,
        }
    }

    pub fn get_mut(&mut self, kind: ChannelKind) -> &mut ChannelSettings {
        match kind {
            ChannelKind::Status => &mut self.status,
            ChannelKind::Satellite => &mut self.satellite,
            ChannelKind::Location => &mut self.location,
            ChannelKind::LocalOscillator => &mut self.local_oscillator,
        }
    }

    /// Enabled channels in start order.
    pub fn enabled(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        ChannelKind::iter().filter(|kind| self.get(*kind).enabled)
    }

    pub fn disable_all(&mut self) {
        for kind in ChannelKind::iter() {
            self.get_mut(kind).enabled = false;
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            status: ChannelSettings::for_kind(ChannelKind::Status),
            satellite: ChannelSettings::for_kind(ChannelKind::Satellite),
            location: ChannelSettings::for_kind(ChannelKind::Location),
            local_oscillator: ChannelSettings::for_kind(ChannelKind::LocalOscillator),
        }
    }
}

// ── Command defaults ─────────────────────────────────────────────────

/// Link and frame parameters sent when the operator leaves them blank.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDefaults {
    pub serial_baudrate: u32,
    /// Serial read timeout on the backend side, seconds.
    pub serial_timeout: f64,
    /// TCP connect timeout on the backend side, seconds.
    pub tcp_timeout: f64,
    /// Backend retries per frame.
    pub retries: u32,
    /// Backend wait per attempt, seconds.
    pub timeout: f64,
}

impl Default for CommandDefaults {
    fn default() -> Self {
        Self {
            serial_baudrate: 38400,
            serial_timeout: 0.5,
            tcp_timeout: 2.0,
            retries: 3,
            timeout: 0.5,
        }
    }
}

// ── ConsoleConfig ────────────────────────────────────────────────────

/// Everything a `Console` needs to reach one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// HTTP root, e.g. `http://127.0.0.1:8000`.
    pub api_base: Url,
    /// WebSocket root, e.g. `ws://127.0.0.1:8000`.
    pub ws_base: Url,
    /// Overall HTTP request timeout. `None` waits as long as the backend
    /// takes, which is what the backend's own retry loop expects.
    pub timeout: Option<Duration>,
    pub channels: ChannelsConfig,
    pub defaults: CommandDefaults,
}

impl ConsoleConfig {
    pub fn new(api_base: Url, ws_base: Url) -> Self {
        Self {
            api_base,
            ws_base,
            timeout: None,
            channels: ChannelsConfig::default(),
            defaults: CommandDefaults::default(),
        }
    }

    /// Full WebSocket URL for a channel.
    pub fn channel_url(&self, kind: ChannelKind) -> Result<Url, url::ParseError> {
        self.ws_base.join(kind.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConsoleConfig {
        ConsoleConfig::new(
            Url::parse("http://10.0.0.5:8000").unwrap(),
            Url::parse("ws://10.0.0.5:8000").unwrap(),
        )
    }

    #[test]
    fn channel_urls_follow_backend_paths() {
        let cfg = config();
        assert_eq!(
            cfg.channel_url(ChannelKind::Status).unwrap().as_str(),
            "ws://10.0.0.5:8000/ws/show"
        );
        assert_eq!(
            cfg.channel_url(ChannelKind::LocalOscillator).unwrap().as_str(),
            "ws://10.0.0.5:8000/ws/lo"
        );
    }

    #[test]
    fn default_reconnect_delays() {
        let channels = ChannelsConfig::default();
        assert_eq!(channels.status.reconnect_delay, Duration::from_millis(1500));
        assert_eq!(channels.satellite.reconnect_delay, Duration::from_millis(2000));
        assert_eq!(channels.location.reconnect_delay, Duration::from_millis(2000));
        assert_eq!(
            channels.local_oscillator.reconnect_delay,
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn disabled_channels_are_skipped() {
        let mut channels = ChannelsConfig::default();
        channels.satellite.enabled = false;
        let enabled: Vec<_> = channels.enabled().collect();
        assert_eq!(
            enabled,
            vec![
                ChannelKind::Status,
                ChannelKind::Location,
                ChannelKind::LocalOscillator
            ]
        );

        channels.disable_all();
        assert_eq!(channels.enabled().count(), 0);
    }

    #[test]
    fn channel_kind_parses_aliases() {
        assert_eq!("show".parse::<ChannelKind>().unwrap(), ChannelKind::Status);
        assert_eq!("PLACE".parse::<ChannelKind>().unwrap(), ChannelKind::Location);
        assert_eq!(ChannelKind::LocalOscillator.to_string(), "lo");
        assert_eq!(ChannelKind::Satellite.to_string(), "satellite");
    }
}
