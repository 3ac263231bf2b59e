use thiserror::Error;

/// Top-level error type for the `acu-api` crate.
///
/// Covers every failure mode across both backend surfaces: the HTTP
/// command endpoint and the WebSocket telemetry channels.
/// `acu-core` maps these into operator-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Failed to build the underlying HTTP client.
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success HTTP response from the backend. `detail` carries the
    /// backend's error text (the `detail` field of its JSON error body
    /// when present, the raw body otherwise).
    #[error("{detail}")]
    Backend { status: u16, detail: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket connection failed or dropped with a transport error.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),
}

impl Error {
    /// HTTP status reported by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the backend gave up waiting on the antenna link
    /// (its own retries were exhausted) or the HTTP request itself timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Backend { status, .. } => *status == 504,
            _ => false,
        }
    }

    /// Returns `true` if the backend could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect(),
            Self::WebSocketConnect(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_displays_detail_only() {
        let err = Error::Backend {
            status: 400,
            detail: "Serial not connected".into(),
        };
        assert_eq!(err.to_string(), "Serial not connected");
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_timeout());
    }

    #[test]
    fn gateway_timeout_counts_as_timeout() {
        let err = Error::Backend {
            status: 504,
            detail: "No response after retries".into(),
        };
        assert!(err.is_timeout());
        assert!(!err.is_unreachable());
    }
}
