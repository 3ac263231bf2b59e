// ── Core error types ──
//
// Operator-facing errors from acu-core. The `From<acu_api::Error>` impl
// folds transport-layer failures into these variants so consumers never
// match on reqwest or tungstenite details.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Console is not running")]
    ConsoleStopped,

    #[error("Timed out: {message}")]
    Timeout { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// Input rejected locally; no request was sent.
    #[error("{message}")]
    ValidationFailed { message: String },

    /// The backend answered with a non-success status.
    #[error("Backend rejected command (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<acu_api::Error> for CoreError {
    fn from(err: acu_api::Error) -> Self {
        match err {
            acu_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        message: e.to_string(),
                    }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            acu_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            acu_api::Error::ClientSetup(message) => CoreError::Config { message },
            acu_api::Error::Backend { status: 504, detail } => {
                CoreError::Timeout { message: detail }
            }
            acu_api::Error::Backend { status, detail } => CoreError::Rejected {
                status,
                message: detail,
            },
            acu_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            acu_api::Error::WebSocketConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket connection failed: {reason}"),
            },
        }
    }
}
