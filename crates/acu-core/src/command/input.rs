// ── Operator input parsing ──
//
// Turns what the operator typed into request bodies. Blank fields get the
// console's defaults (or `null` where the backend distinguishes "unset"),
// and anything that cannot be parsed is rejected before a request is
// built.

use acu_api::models::{
    LoMode, LocalOscillatorRequest, LocationRequest, ManualPositionRequest, ManualSpeedRequest,
    SatelliteProfileRequest,
};

use crate::error::CoreError;

/// Reported when a TCP target has no usable `host:port` shape.
pub const TCP_TARGET_MESSAGE: &str = "TCP target must be like ip:port";

// ── Scalars ──────────────────────────────────────────────────────────

/// Split `host:port` at the first colon.
pub fn parse_tcp_target(target: &str) -> Result<(String, u16), CoreError> {
    let (host, port) = target
        .trim()
        .split_once(':')
        .ok_or_else(|| CoreError::validation(TCP_TARGET_MESSAGE))?;
    let host = host.trim();
    let port = port
        .trim()
        .parse::<u16>()
        .map_err(|_| CoreError::validation(TCP_TARGET_MESSAGE))?;
    if host.is_empty() {
        return Err(CoreError::validation(TCP_TARGET_MESSAGE));
    }
    Ok((host.to_owned(), port))
}

/// Free-form custom data: comma separated, trimmed, empty parts dropped.
pub fn parse_custom_data(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Blank is `None`; anything else must be a finite number.
pub fn optional_number(field: &str, text: &str) -> Result<Option<f64>, CoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(CoreError::validation(format!(
            "{field} must be a number, got '{text}'"
        ))),
    }
}

/// Blank is `default`; anything else must be a finite number.
pub fn number_or(field: &str, text: &str, default: f64) -> Result<f64, CoreError> {
    Ok(optional_number(field, text)?.unwrap_or(default))
}

/// Polarization mode accepts 0 (horizontal) or 1 (vertical); any other
/// value is folded into that range.
pub fn clamp_pol_mode(value: f64) -> u8 {
    if value <= 0.0 { 0 } else { 1 }
}

// ── Forms ────────────────────────────────────────────────────────────

/// Satellite profile as typed. Every numeric field may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SatelliteForm {
    pub name: String,
    pub center_freq: String,
    pub carrier_freq: String,
    pub carrier_rate: String,
    pub sat_longitude: String,
    pub pol_mode: String,
    pub lock_threshold: String,
}

impl SatelliteForm {
    pub fn to_request(&self) -> Result<SatelliteProfileRequest, CoreError> {
        Ok(SatelliteProfileRequest {
            name: self.name.trim().to_owned(),
            center_freq: number_or("center_freq", &self.center_freq, 0.0)?,
            carrier_freq: number_or("carrier_freq", &self.carrier_freq, 0.0)?,
            carrier_rate: number_or("carrier_rate", &self.carrier_rate, 0.0)?,
            sat_longitude: number_or("sat_longitude", &self.sat_longitude, 0.0)?,
            pol_mode: clamp_pol_mode(number_or("pol_mode", &self.pol_mode, 0.0)?),
            lock_threshold: number_or("lock_threshold", &self.lock_threshold, 5.0)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationForm {
    pub longitude: String,
    pub latitude: String,
    /// Blank leaves the heading out of the request entirely.
    pub heading: String,
}

impl LocationForm {
    pub fn to_request(&self) -> Result<LocationRequest, CoreError> {
        Ok(LocationRequest {
            longitude: number_or("longitude", &self.longitude, 0.0)?,
            latitude: number_or("latitude", &self.latitude, 0.0)?,
            heading: optional_number("heading", &self.heading)?,
        })
    }
}

/// Manual positioning. Blank axis fields are sent as `null`, which the
/// backend treats differently from `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualPositionForm {
    pub sport_type: String,
    pub az_target: String,
    pub az_speed: String,
    pub pitch_target: String,
    pub pitch_speed: String,
    pub pol_target: String,
    pub pol_speed: String,
}

impl ManualPositionForm {
    pub fn to_request(&self) -> Result<ManualPositionRequest, CoreError> {
        Ok(ManualPositionRequest {
            sport_type: self.sport_type.trim().to_owned(),
            az_target: optional_number("az_target", &self.az_target)?,
            az_speed: optional_number("az_speed", &self.az_speed)?,
            pitch_target: optional_number("pitch_target", &self.pitch_target)?,
            pitch_speed: optional_number("pitch_speed", &self.pitch_speed)?,
            pol_target: optional_number("pol_target", &self.pol_target)?,
            pol_speed: optional_number("pol_speed", &self.pol_speed)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeedForm {
    pub direction_code: String,
    pub speed: String,
}

impl SpeedForm {
    pub fn to_request(&self) -> Result<ManualSpeedRequest, CoreError> {
        let speed = optional_number("speed", &self.speed)?
            .ok_or_else(|| CoreError::validation("Speed value required."))?;
        Ok(ManualSpeedRequest {
            direction_code: self.direction_code.trim().to_owned(),
            speed,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalOscillatorForm {
    pub mode: LoMode,
    pub lo_mhz: String,
    pub gain: String,
}

impl LocalOscillatorForm {
    pub fn to_request(&self) -> Result<LocalOscillatorRequest, CoreError> {
        Ok(LocalOscillatorRequest {
            mode: self.mode,
            lo_mhz: number_or("lo_mhz", &self.lo_mhz, 0.0)?,
            gain: number_or("gain", &self.gain, 0.0)?,
        })
    }
}
