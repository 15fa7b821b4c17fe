/// Tool for the home-screen status
///
/// This module implements the status MCP tool: pain-free streak, this week's
/// strip and this month's severity counts.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::analytics::{AnalyticsEngine, StatusSummary};
use crate::storage::SlotStorage;
use crate::store::LogStore;

/// Response from checking status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: StatusSummary,
    pub message: String,
}

/// Build the status view; with no arguments to validate, it cannot fail
pub fn get_status<S: SlotStorage>(
    store: &LogStore<S>,
    engine: &AnalyticsEngine,
    now: NaiveDateTime,
) -> StatusResponse {
    let status = engine.status(store.logs(), now);

    let streak = match status.streak.days() {
        Some(days) => format!("{} day{} pain-free", days, if days == 1 { "" } else { "s" }),
        None => "Pain-free streak: -".to_string(),
    };

    let week = status
        .week
        .iter()
        .map(|day| format!("{} {}: {}", day.weekday, day.day, day.medication.label()))
        .collect::<Vec<_>>()
        .join("\n");

    let month = &status.month;
    let message = format!(
        "{}\n{}\n\nThis week:\n{}\n\n{}: {} attacks (Mild {}, Moderate {}, Severe {}), {} pain-free days",
        streak,
        status.last_attack,
        week,
        month.month.long_label(),
        month.total,
        month.mild,
        month.moderate,
        month.severe,
        month.pain_free_days
    );

    StatusResponse { status, message }
}
