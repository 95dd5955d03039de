use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::utils::timefmt;

/// Default reading range substituted when a draft omits or inverts its bounds.
pub const DEFAULT_MIN: f64 = 0.0;
pub const DEFAULT_MAX: f64 = 100.0;

/// Default update period in seconds for sensors that don't specify one.
pub const DEFAULT_FREQUENCY_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Pressure,
    Humidity,
    Power,
    Flow,
    Other(String),
}

impl SensorKind {
    /// Parse a category label. Unknown labels are kept as-is rather than
    /// rejected, so the category set stays open.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "temperature" => SensorKind::Temperature,
            "pressure" => SensorKind::Pressure,
            "humidity" => SensorKind::Humidity,
            "power" => SensorKind::Power,
            "flow" => SensorKind::Flow,
            _ => SensorKind::Other(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Pressure => "Pressure",
            SensorKind::Humidity => "Humidity",
            SensorKind::Power => "Power",
            SensorKind::Flow => "Flow",
            SensorKind::Other(label) => label,
        }
    }

    pub fn default_unit(&self) -> &str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Pressure => "bar",
            SensorKind::Humidity => "%",
            SensorKind::Power => "kW",
            SensorKind::Flow => "L/min",
            SensorKind::Other(_) => "",
        }
    }

    /// Combine a reading with its unit. Temperature and humidity read better
    /// without a separating space (23.5°C, 68%); the rest take one.
    pub fn format_value(&self, value: f64, unit: &str) -> String {
        match self {
            SensorKind::Pressure | SensorKind::Power | SensorKind::Flow => {
                format!("{value} {unit}")
            }
            _ => format!("{value}{unit}"),
        }
    }
}

impl Default for SensorKind {
    fn default() -> Self {
        SensorKind::Temperature
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorStatus {
    Success,
    Warning,
    Error,
}

impl SensorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorStatus::Success => "success",
            SensorStatus::Warning => "warning",
            SensorStatus::Error => "error",
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A simulated sensor. The mutable tail (`value`, `status`, `last_updated`)
/// is rewritten in place by the engine on every tick for this sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub id: u32,
    pub name: String,
    pub kind: SensorKind,
    pub unit: String,
    pub min: f64,
    pub max: f64,
    /// Milliseconds between updates, always > 0.
    pub frequency_ms: u64,
    pub location: String,
    /// Last reading formatted with the unit, e.g. "23.5°C".
    pub value: String,
    pub status: SensorStatus,
    pub last_updated: DateTime<Utc>,
}

impl Sensor {
    /// Relative age of the last reading ("Just now", "45s ago", ...).
    pub fn last_updated_display(&self, now: DateTime<Utc>) -> String {
        timefmt::relative_time(self.last_updated, now)
    }
}

fn deserialize_opt_secs<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    // Form input arrives as a string, programmatic input as a number
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SecsInput {
        Number(u64),
        Text(String),
    }

    match Option::<SecsInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(SecsInput::Number(n)) => Ok(Some(n)),
        Some(SecsInput::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Partially specified sensor description, as submitted by the "add sensor"
/// form. Every field is optional; [`SensorDraft::into_sensor`] substitutes
/// defaults so that building a sensor can never fail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorDraft {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub unit: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Update period in whole seconds (callers think in seconds; the engine
    /// stores milliseconds).
    #[serde(default, deserialize_with = "deserialize_opt_secs")]
    pub frequency: Option<u64>,
    pub location: Option<String>,
}

impl SensorDraft {
    /// Build a complete sensor, substituting defaults for anything missing
    /// or malformed: inverted/absent bounds become 0–100, a zero frequency
    /// becomes 5 s, an empty name becomes "S-{id + 100}", the unit is
    /// derived from the kind.
    pub fn into_sensor(self, id: u32, now: DateTime<Utc>) -> Sensor {
        let kind = self
            .kind
            .as_deref()
            .map(SensorKind::parse)
            .unwrap_or_default();

        let unit = match self.unit {
            Some(unit) if !unit.trim().is_empty() => unit,
            _ => kind.default_unit().to_string(),
        };

        let mut min = self.min.unwrap_or(DEFAULT_MIN);
        let mut max = self.max.unwrap_or(DEFAULT_MAX);
        if !(min < max) {
            min = DEFAULT_MIN;
            max = DEFAULT_MAX;
        }

        let frequency_ms = self
            .frequency
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_FREQUENCY_SECS)
            * 1000;

        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => format!("S-{}", id + 100),
        };

        let location = match self.location {
            Some(location) if !location.trim().is_empty() => location,
            _ => "Not specified".to_string(),
        };

        // A fresh sensor reads at the bottom of its range until its first tick
        let value = kind.format_value(min, &unit);

        Sensor {
            id,
            name,
            kind,
            unit,
            min,
            max,
            frequency_ms,
            location,
            value,
            status: SensorStatus::Success,
            last_updated: now,
        }
    }
}
