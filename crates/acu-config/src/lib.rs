//! Configuration for the ACU console front ends.
//!
//! One TOML file at the platform config path, overlaid with `ACU_`
//! environment variables, translated into an `acu_core::ConsoleConfig`.
//! Command-line overrides are applied by the binary before translation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use acu_core::{ChannelKind, ChannelSettings, ChannelsConfig, CommandDefaults, ConsoleConfig};

/// Prefix for environment overrides, e.g. `ACU_BACKEND__API_BASE`.
pub const ENV_PREFIX: &str = "ACU_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Output preferences for the CLI.
    pub defaults: Defaults,
    pub backend: BackendSection,
    pub channels: ChannelsSection,
    pub serial: SerialSection,
    pub tcp: TcpSection,
    pub command: CommandSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    /// Used when `--output` is absent: `table`, `json`, `json-compact`,
    /// `yaml` or `plain`.
    pub output: String,
    /// Used when `--color` is absent: `auto`, `always` or `never`.
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: "table".into(),
            color: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendSection {
    /// HTTP root of the backend.
    pub api_base: String,
    /// WebSocket root of the backend.
    pub ws_base: String,
    /// Overall HTTP timeout in seconds. Unset means no client-side limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<f64>,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".into(),
            ws_base: "ws://127.0.0.1:8000".into(),
            timeout_secs: None,
        }
    }
}

/// One `[channels.<name>]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChannelSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Falls back to the channel's built-in delay when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconnect_delay_ms: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl ChannelSection {
    fn for_kind(kind: ChannelKind) -> Self {
        Self {
            enabled: true,
            reconnect_delay_ms: u64::try_from(kind.default_reconnect_delay().as_millis()).ok(),
        }
    }

    fn to_settings(self, kind: ChannelKind) -> Result<ChannelSettings, ConfigError> {
        let reconnect_delay = match self.reconnect_delay_ms {
            Some(0) => {
                return Err(ConfigError::validation(
                    &format!("channels.{kind}.reconnect_delay_ms"),
                    "must be greater than zero",
                ));
            }
            Some(ms) => Duration::from_millis(ms),
            None => kind.default_reconnect_delay(),
        };
        Ok(ChannelSettings {
            enabled: self.enabled,
            reconnect_delay,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelsSection {
    pub status: ChannelSection,
    pub satellite: ChannelSection,
    pub location: ChannelSection,
    pub lo: ChannelSection,
}

impl Default for ChannelsSection {
    fn default() -> Self {
        Self {
            status: ChannelSection::for_kind(ChannelKind::Status),
            satellite: ChannelSection::for_kind(ChannelKind::Satellite),
            location: ChannelSection::for_kind(ChannelKind::Location),
            lo: ChannelSection::for_kind(ChannelKind::LocalOscillator),
        }
    }
}

impl ChannelsSection {
    pub fn get(&self, kind: ChannelKind) -> ChannelSection {
        match kind {
            ChannelKind::Status => self.status,
            ChannelKind::Satellite => self.satellite,
            ChannelKind::Location => self.location,
            ChannelKind::LocalOscillator => self.lo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SerialSection {
    pub baudrate: u32,
    /// Backend serial read timeout, seconds.
    pub timeout: f64,
}

impl Default for SerialSection {
    fn default() -> Self {
        let defaults = CommandDefaults::default();
        Self {
            baudrate: defaults.serial_baudrate,
            timeout: defaults.serial_timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TcpSection {
    /// Backend TCP connect timeout, seconds.
    pub timeout: f64,
}

impl Default for TcpSection {
    fn default() -> Self {
        Self {
            timeout: CommandDefaults::default().tcp_timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandSection {
    /// Backend retries per frame.
    pub retries: u32,
    /// Backend wait per attempt, seconds.
    pub timeout: f64,
}

impl Default for CommandSection {
    fn default() -> Self {
        let defaults = CommandDefaults::default();
        Self {
            retries: defaults.retries,
            timeout: defaults.timeout,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "acu", "acuctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("acuctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Nested keys use a double underscore in the environment, so
/// `ACU_BACKEND__API_BASE` overrides `backend.api_base`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the runtime `ConsoleConfig`, validating URLs and timeouts.
pub fn to_console_config(cfg: &Config) -> Result<ConsoleConfig, ConfigError> {
    let api_base = parse_url("backend.api_base", &cfg.backend.api_base, &["http", "https"])?;
    let ws_base = parse_url("backend.ws_base", &cfg.backend.ws_base, &["ws", "wss"])?;

    let timeout = match cfg.backend.timeout_secs {
        None => None,
        Some(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
        Some(secs) => {
            return Err(ConfigError::validation(
                "backend.timeout_secs",
                format!("must be a positive number of seconds, got {secs}"),
            ));
        }
    };

    let mut channels = ChannelsConfig::default();
    for kind in [
        ChannelKind::Status,
        ChannelKind::Satellite,
        ChannelKind::Location,
        ChannelKind::LocalOscillator,
    ] {
        *channels.get_mut(kind) = cfg.channels.get(kind).to_settings(kind)?;
    }

    Ok(ConsoleConfig {
        api_base,
        ws_base,
        timeout,
        channels,
        defaults: CommandDefaults {
            serial_baudrate: cfg.serial.baudrate,
            serial_timeout: cfg.serial.timeout,
            tcp_timeout: cfg.tcp.timeout,
            retries: cfg.command.retries,
            timeout: cfg.command.timeout,
        },
    })
}

fn parse_url(field: &str, raw: &str, schemes: &[&str]) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::validation(field, format!("invalid URL '{raw}': {e}")))?;
    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::validation(
            field,
            format!("expected a {} URL, got '{raw}'", schemes.join("/")),
        ));
    }
    Ok(url)
}
