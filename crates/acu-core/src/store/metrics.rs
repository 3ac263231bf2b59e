// ── Telemetry metrics table ──
//
// Fixed key set, partial merge. Every snapshot from the status channel or
// from a command echo funnels through `MetricsStore::apply_snapshot`.

use std::collections::BTreeMap;
use std::fmt;

use acu_api::models::Snapshot;
use serde::Serialize;
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tokio::sync::watch;

/// Telemetry fields reported by `$show`, in display order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricKey {
    PresetAzimuth,
    PresetPitch,
    PresetPolarization,
    CurrentAzimuth,
    CurrentPitch,
    CurrentPolarization,
    AntennaStatus,
    CarrierHeading,
    CarrierPitch,
    CarrierRoll,
    Longitude,
    Latitude,
    GpsStatus,
    LimitInfo,
    AlertInfo,
    AgcLevel,
    AzPot,
    PitchPot,
    Time,
    Checksum,
}

/// Latest value of one metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    #[default]
    Unknown,
    Known(String),
}

impl MetricValue {
    /// Map a snapshot value onto a slot: `null` and `""` mean unknown,
    /// anything else is kept as text.
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Unknown,
            Value::String(s) if s.is_empty() => Self::Unknown,
            Value::String(s) => Self::Known(s.clone()),
            other => Self::Known(other.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Unknown => None,
            Self::Known(s) => Some(s),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("-"),
            Self::Known(s) => f.write_str(s),
        }
    }
}

// ── MetricsTable ─────────────────────────────────────────────────────

/// One slot per [`MetricKey`]. Slots are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricsTable {
    slots: BTreeMap<MetricKey, MetricValue>,
}

impl MetricsTable {
    /// A table with every slot `Unknown`.
    pub fn new() -> Self {
        Self {
            slots: MetricKey::iter().map(|k| (k, MetricValue::Unknown)).collect(),
        }
    }

    pub fn get(&self, key: MetricKey) -> &MetricValue {
        self.slots.get(&key).unwrap_or(&MetricValue::Unknown)
    }

    /// Slots in display order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, &MetricValue)> {
        self.slots.iter().map(|(k, v)| (*k, v))
    }

    /// Merge a partial snapshot. Keys outside the fixed set are ignored
    /// and absent keys keep their value. Returns whether any slot changed.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> bool {
        let mut changed = false;
        for (name, value) in snapshot {
            let Ok(key) = name.parse::<MetricKey>() else {
                continue;
            };
            let next = MetricValue::from_json(value);
            let slot = self.slots.entry(key).or_default();
            if *slot != next {
                *slot = next;
                changed = true;
            }
        }
        changed
    }
}

impl Default for MetricsTable {
    fn default() -> Self {
        Self::new()
    }
}

// ── MetricsStore ─────────────────────────────────────────────────────

/// Shared metrics table with change notification.
pub struct MetricsStore {
    table: watch::Sender<MetricsTable>,
}

impl MetricsStore {
    pub fn new() -> Self {
        let (table, _) = watch::channel(MetricsTable::new());
        Self { table }
    }

    /// Merge a partial snapshot as one atomic step. Subscribers are woken
    /// only if a slot actually changed.
    pub fn apply_snapshot(&self, snapshot: &Snapshot) -> bool {
        self.table.send_if_modified(|table| table.apply_snapshot(snapshot))
    }

    pub fn snapshot(&self) -> MetricsTable {
        self.table.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MetricsTable> {
        self.table.subscribe()
    }
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new()
    }
}
