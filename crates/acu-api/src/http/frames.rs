// Frame exchange endpoints
//
// Raw command frames and the read-back queries. Every call here maps to
// exactly one frame sent to the antenna by the backend.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::http::client::AcuClient;
use crate::models::{FrameExchange, LocalOscillatorReadback, SendRequest};

impl AcuClient {
    /// Send an arbitrary command frame.
    ///
    /// `POST /api/send`
    ///
    /// `retries` and `timeout` are forwarded to the backend, which owns the
    /// retry loop against the antenna link.
    pub async fn send(&self, req: &SendRequest) -> Result<FrameExchange, Error> {
        debug!(
            frame_code = %req.frame_code,
            fields = req.data.len(),
            retries = req.retries,
            timeout = req.timeout,
            "sending frame"
        );
        self.post("send", req).await
    }

    /// Query the antenna state once (`get show`), parsed.
    ///
    /// `GET /api/status`
    pub async fn status(&self) -> Result<FrameExchange, Error> {
        self.get("status").await
    }

    /// Stop all motion.
    ///
    /// `POST /api/stop`
    pub async fn stop(&self) -> Result<FrameExchange, Error> {
        self.post("stop", &json!({})).await
    }

    /// Read back the stored satellite profile.
    ///
    /// `GET /api/satellite/get`
    pub async fn get_satellite(&self) -> Result<FrameExchange, Error> {
        self.get("satellite/get").await
    }

    /// Read back the configured site location.
    ///
    /// `GET /api/location/get`
    pub async fn get_location(&self) -> Result<FrameExchange, Error> {
        self.get("location/get").await
    }

    /// Read back both local oscillator settings.
    ///
    /// `GET /api/lo/get`
    pub async fn get_local_oscillator(&self) -> Result<LocalOscillatorReadback, Error> {
        self.get("lo/get").await
    }
}
