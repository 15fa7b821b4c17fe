/// Tool for the month calendar
///
/// This module implements the calendar_month MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, CalendarMonth, YearMonth};
use crate::storage::SlotStorage;
use crate::store::LogStore;
use crate::tools::ToolError;

/// Parameters for the calendar view
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CalendarParams {
    /// Month to show, YYYY-MM (default: the current month)
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub calendar: CalendarMonth,
    pub message: String,
}

/// Marked days, attack count and per-day frequency for a month
pub fn calendar_view<S: SlotStorage>(
    store: &LogStore<S>,
    engine: &AnalyticsEngine,
    params: CalendarParams,
    today: NaiveDate,
) -> Result<CalendarResponse, ToolError> {
    let month = match params.month.as_deref() {
        Some(m) => m.parse::<YearMonth>()?,
        None => YearMonth::of(today),
    };

    let calendar = engine.calendar(store.logs(), month);

    let mut message = format!(
        "{}: {} attack day{}",
        calendar.label,
        calendar.attack_days,
        if calendar.attack_days == 1 { "" } else { "s" }
    );
    for marked in &calendar.marked_days {
        let severity = marked.severity.map(|s| s.display_name()).unwrap_or("no severity");
        message.push_str(&format!("\n- {} {}", marked.day, severity));
    }

    Ok(CalendarResponse { calendar, message })
}
