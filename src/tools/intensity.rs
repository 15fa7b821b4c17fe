/// Tool for the time-intensity chart
///
/// This module implements the intensity_curve MCP tool.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{daily_intensity_curve, peak_intensity, HourlyIntensity};
use crate::domain::DateKey;
use crate::storage::SlotStorage;
use crate::store::LogStore;
use crate::tools::{parse_day, DayParams, ToolError};

#[derive(Debug, Serialize)]
pub struct IntensityResponse {
    pub day: DateKey,
    /// 25 points, midnight to midnight
    pub points: Vec<HourlyIntensity>,
    pub message: String,
}

pub fn intensity_curve<S: SlotStorage>(
    store: &LogStore<S>,
    params: DayParams,
    today: NaiveDate,
) -> Result<IntensityResponse, ToolError> {
    let day = parse_day(params.day.as_deref(), today)?;
    let points = daily_intensity_curve(store.logs(), day);

    let message = match peak_intensity(&points) {
        None => format!("No attack in progress at any hour on {}", day),
        Some(peak) => {
            let active = points
                .iter()
                .filter_map(|p| p.intensity.map(|i| format!("{} {}", p.label, i)))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Intensity on {} (peak {} at {}): {}",
                day,
                peak.intensity.unwrap_or_default(),
                peak.label,
                active
            )
        }
    };

    Ok(IntensityResponse { day, points, message })
}
