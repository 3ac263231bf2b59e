// Antenna configuration and motion endpoints

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::http::client::AcuClient;
use crate::models::{
    AntennaAction, AntennaActionRequest, FrameExchange, LocalOscillatorRequest, LocationRequest,
    ManualPositionRequest, ManualSpeedRequest, SatelliteProfileRequest,
};

impl AcuClient {
    /// Store a satellite tracking profile.
    ///
    /// `POST /api/satellite/set`
    pub async fn set_satellite(&self, req: &SatelliteProfileRequest) -> Result<FrameExchange, Error> {
        debug!(name = %req.name, pol_mode = req.pol_mode, "setting satellite profile");
        self.post("satellite/set", req).await
    }

    /// Store the site location.
    ///
    /// `POST /api/location/set`
    pub async fn set_location(&self, req: &LocationRequest) -> Result<FrameExchange, Error> {
        debug!(
            longitude = req.longitude,
            latitude = req.latitude,
            heading = ?req.heading,
            "setting location"
        );
        self.post("location/set", req).await
    }

    /// Drive the axes to targets at the given speeds.
    ///
    /// `POST /api/manual/dirx`
    pub async fn manual_position(&self, req: &ManualPositionRequest) -> Result<FrameExchange, Error> {
        debug!(sport_type = %req.sport_type, "manual positioning");
        self.post("manual/dirx", req).await
    }

    /// Move in one direction at a fixed speed.
    ///
    /// `POST /api/manual/speed`
    pub async fn manual_speed(&self, req: &ManualSpeedRequest) -> Result<FrameExchange, Error> {
        debug!(direction = %req.direction_code, speed = req.speed, "manual speed");
        self.post("manual/speed", req).await
    }

    /// Configure a local oscillator and its gain.
    ///
    /// `POST /api/lo/set`
    pub async fn set_local_oscillator(
        &self,
        req: &LocalOscillatorRequest,
    ) -> Result<FrameExchange, Error> {
        debug!(mode = %req.mode, lo_mhz = req.lo_mhz, gain = req.gain, "setting local oscillator");
        self.post("lo/set", req).await
    }

    /// Run an antenna lifecycle action on its dedicated endpoint.
    ///
    /// `POST /api/antenna/reset`, `/api/antenna/align_star`,
    /// `/api/antenna/collection`, or `/api/stop`.
    pub async fn antenna(&self, action: AntennaAction) -> Result<FrameExchange, Error> {
        debug!(%action, "antenna action");
        let path = match action {
            AntennaAction::Reset => "antenna/reset",
            AntennaAction::AlignStar => "antenna/align_star",
            AntennaAction::Collection => "antenna/collection",
            AntennaAction::Stop => "stop",
        };
        self.post(path, &json!({})).await
    }

    /// Run an antenna lifecycle action through the unified endpoint.
    ///
    /// `POST /api/antenna/action`
    pub async fn antenna_action(&self, action: AntennaAction) -> Result<FrameExchange, Error> {
        debug!(%action, "unified antenna action");
        self.post("antenna/action", &AntennaActionRequest { action }).await
    }
}
