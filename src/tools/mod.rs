/// MCP tools for the migraine tracker
///
/// This module contains all the MCP tools that external clients can call to
/// log attacks and read the derived views. Each tool takes typed parameters
/// (their JSON schema is published by `tools/list`) and returns a response
/// whose `message` is the text shown to the user.

pub mod calendar;
pub mod insights;
pub mod intensity;
pub mod list;
pub mod log;
pub mod status;

pub use calendar::*;
pub use insights::*;
pub use intensity::*;
pub use list::*;
pub use log::*;
pub use status::*;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::domain::{local_timestamp, AttackLog, DateKey, DomainError};
use crate::store::StoreError;

/// Errors a tool call can report back to the client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolve a day argument; `None` means today
///
/// Accepts `YYYY-MM-DD` (or any timestamp, by its date), `today` and
/// `yesterday`.
pub(crate) fn parse_day(input: Option<&str>, today: NaiveDate) -> Result<DateKey, DomainError> {
    match input.map(str::trim) {
        None | Some("") => Ok(DateKey::new(today)),
        Some(s) if s.eq_ignore_ascii_case("today") => Ok(DateKey::new(today)),
        Some(s) if s.eq_ignore_ascii_case("yesterday") => Ok(DateKey::new(today - Duration::days(1))),
        Some(s) => DateKey::parse(s),
    }
}

/// One-line description of a log for tool messages
pub(crate) fn describe_log(log: &AttackLog) -> String {
    let mut parts = vec![format!(
        "{} {}",
        log.day(),
        log.severity.map(|s| s.display_name()).unwrap_or("(no severity)")
    )];

    let start = log.start_time.format("%H:%M");
    match log.end_time {
        Some(end) if end != log.start_time && end.date() == log.date() => {
            parts.push(format!("{} to {}", start, end.format("%H:%M")))
        }
        Some(end) if end != log.start_time => {
            parts.push(format!("{} to {}", start, local_timestamp::format(&end).replace('T', " ")))
        }
        _ => parts.push(format!("at {}", start)),
    }

    if let Some(value) = log.duration_value {
        parts.push(format!("{} {}", value, log.duration_unit.display_name()));
    }
    if !log.triggers.is_empty() {
        parts.push(format!("triggers: {}", join(&log.triggers)));
    }
    if !log.symptoms.is_empty() {
        parts.push(format!("symptoms: {}", join(&log.symptoms)));
    }
    if !log.medications.is_empty() {
        parts.push(format!("meds: {}", join(&log.medications)));
    }

    parts.join(" | ")
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}
