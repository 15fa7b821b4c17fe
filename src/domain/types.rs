/// Core types and enums used throughout the domain layer
///
/// This module defines the identifier, calendar-day key, severity scale and
/// duration unit used by AttackLog, plus the serde helpers that keep the
/// persisted timestamp format stable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for an attack log
///
/// New ids are random UUIDs, but any string is accepted when loading so that
/// records written by older clients (e.g. `sample-1`) keep their identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(pub String);

impl LogId {
    /// Generate a new random log ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier (useful for loading persisted data)
    pub fn from_string(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar day (year-month-day) used to bucket and match logs
///
/// Logs are matched to a day by the date part of their start time, which is
/// the same thing as comparing the `YYYY-MM-DD` prefix of the stored string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(pub NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The day a timestamp falls on
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self(timestamp.date())
    }

    /// Parse a day from a string, using only its `YYYY-MM-DD` prefix
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        let prefix = trimmed
            .get(..10)
            .ok_or_else(|| DomainError::InvalidDate(trimmed.to_string()))?;

        NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DomainError::InvalidDate(trimmed.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Midnight at the start of this day
    pub fn start(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// Check whether a timestamp falls on this day
    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        timestamp.date() == self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// How bad an attack was
///
/// The ordering runs from least to most severe, which the analytics layer
/// relies on when breaking ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Every severity level, least severe first
    pub const ALL: [Severity; 3] = [Severity::Mild, Severity::Moderate, Severity::Severe];

    /// Numeric pain level used by the intensity curve
    pub fn intensity(&self) -> u8 {
        match self {
            Severity::Mild => 3,
            Severity::Moderate => 6,
            Severity::Severe => 9,
        }
    }

    /// Get the display name for this severity
    pub fn display_name(&self) -> &'static str {
        match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }

    /// Case-insensitive lookup; `None` for anything outside the scale
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.display_name().eq_ignore_ascii_case(s.trim()))
    }

    fn index(&self) -> usize {
        match self {
            Severity::Mild => 0,
            Severity::Moderate => 1,
            Severity::Severe => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::InvalidSeverity(s.to_string()))
    }
}

/// Per-severity counters indexed by `Severity`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityTally([usize; 3]);

impl SeverityTally {
    pub fn add(&mut self, severity: Severity) {
        self.0[severity.index()] += 1;
    }

    pub fn get(&self, severity: Severity) -> usize {
        self.0[severity.index()]
    }

    /// Number of tallied logs that carried a recognised severity
    pub fn classified(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Unit for an attack's recorded duration
///
/// Unrecognised stored units load as hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    #[default]
    Hours,
    Days,
}

impl<'de> Deserialize<'de> for DurationUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(unit)) => unit.parse().unwrap_or_default(),
            _ => DurationUnit::default(),
        })
    }
}

impl DurationUnit {
    /// Convert a value in this unit to hours
    pub fn to_hours(&self, value: f64) -> f64 {
        match self {
            DurationUnit::Minutes => value / 60.0,
            DurationUnit::Hours => value,
            DurationUnit::Days => value * 24.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
        }
    }
}

impl FromStr for DurationUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "min" | "mins" | "minute" | "minutes" => Ok(DurationUnit::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Ok(DurationUnit::Hours),
            "d" | "day" | "days" => Ok(DurationUnit::Days),
            other => Err(DomainError::InvalidValue {
                message: format!("Unknown duration unit '{}'. Valid options: minutes, hours, days", other),
            }),
        }
    }
}

/// Zone-less local timestamps as they appear in the persisted slot
///
/// Written as `YYYY-MM-DDTHH:MM` (seconds appended only when non-zero).
/// Reading also accepts seconds, fractional seconds, a space separator,
/// RFC 3339 with an offset (the offset is dropped) and a bare date.
pub mod local_timestamp {
    use super::*;

    const FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    pub fn format(timestamp: &NaiveDateTime) -> String {
        if timestamp.nanosecond() != 0 {
            timestamp.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
        } else if timestamp.second() != 0 {
            timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            timestamp.format("%Y-%m-%dT%H:%M").to_string()
        }
    }

    pub fn parse(s: &str) -> Result<NaiveDateTime, DomainError> {
        let trimmed = s.trim();

        for format in FORMATS {
            if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(timestamp);
            }
        }

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(with_offset.naive_local());
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(date.and_time(NaiveTime::MIN));
        }

        Err(DomainError::InvalidTimestamp(trimmed.to_string()))
    }

    pub fn serialize<S: Serializer>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(timestamp))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Same format for optional fields
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            timestamp: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match timestamp {
                Some(ts) => serializer.serialize_some(&format(ts)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => parse(&raw).map(Some).map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

/// Read a stored severity without failing the whole record
///
/// Anything that is not one of the three known names loads as absent.
pub(crate) fn lenient_severity<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Severity>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => Severity::parse(&s),
        _ => None,
    })
}

/// Read a stored duration that may have been saved as a number or a string
pub(crate) fn lenient_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|value| value.is_finite()))
}
