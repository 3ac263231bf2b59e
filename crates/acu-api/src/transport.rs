// Shared transport configuration for building reqwest::Client instances.
//
// The backend normally runs on the operator's machine over plain HTTP, so
// there is no TLS or cookie handling here, only timeout and identification.

use std::time::Duration;

const USER_AGENT: &str = concat!("acuctl/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Whole-request timeout. `None` leaves the request open until the
    /// backend answers; the backend owns the retry/timeout loop against
    /// the antenna link and always replies eventually.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| crate::error::Error::ClientSetup(format!("failed to build HTTP client: {e}")))
    }
}
