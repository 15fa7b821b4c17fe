/// Tool for the analytics dashboard
///
/// This module implements the analytics MCP tool that summarises the logs
/// inside a time window.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, AnalyticsOverview, TimeWindow};
use crate::storage::SlotStorage;
use crate::store::LogStore;
use crate::tools::ToolError;

/// Parameters for the analytics dashboard
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct AnalyticsParams {
    /// Time window: 7d, 30d, 3m, 6m or all (default: 30d)
    pub window: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub overview: AnalyticsOverview,
    pub message: String,
}

pub fn get_analytics<S: SlotStorage>(
    store: &LogStore<S>,
    engine: &AnalyticsEngine,
    params: AnalyticsParams,
    now: NaiveDateTime,
) -> Result<AnalyticsResponse, ToolError> {
    let window = match params.window.as_deref() {
        Some(w) => w.parse::<TimeWindow>()?,
        None => TimeWindow::default(),
    };

    let overview = engine.overview(store.logs(), window, now);
    let message = format_overview(&overview);

    Ok(AnalyticsResponse { overview, message })
}

fn format_overview(overview: &AnalyticsOverview) -> String {
    let mut lines = vec![
        format!("Analytics ({})", overview.window),
        format!("Total attacks: {}", overview.total),
        format!("Avg duration: {}h", overview.average_duration_hours),
        format!(
            "Common severity: {}",
            overview.common_severity.map(|s| s.display_name()).unwrap_or("-")
        ),
        format!("Longest pain-free run: {} days", overview.longest_pain_free_run),
    ];

    let severity = overview
        .severity
        .slices
        .iter()
        .map(|slice| format!("{} {} ({}%)", slice.severity, slice.count, slice.percent))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Severity: {}", severity));

    let trend = overview
        .trend
        .iter()
        .map(|bucket| format!("{} {}", bucket.label, bucket.count))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Trend: {}", trend));

    if overview.top_triggers.is_empty() {
        lines.push("Top triggers: none recorded".to_string());
    } else {
        let triggers = overview
            .top_triggers
            .iter()
            .map(|t| format!("{} ({})", t.trigger, t.count))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Top triggers: {}", triggers));
    }

    lines.join("\n")
}
