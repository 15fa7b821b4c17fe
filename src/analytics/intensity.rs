/// Hour-by-hour intensity curve for a single day

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::domain::{AttackLog, DateKey};

/// Pain intensity at one sampled hour; `None` where no attack is in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyIntensity {
    /// 0 through 24, where 24 is the following midnight
    pub hour: u32,
    /// e.g. "9:00"
    pub label: String,
    pub intensity: Option<u8>,
}

fn overlaps(log: &AttackLog, day_start: NaiveDateTime, day_end: NaiveDateTime) -> bool {
    let end = log.effective_end();
    if end == log.start_time {
        // Zero-length entry: belongs to the day it was logged on
        return log.start_time >= day_start && log.start_time < day_end;
    }
    log.start_time < day_end && end > day_start
}

/// 25 points, one per hour from midnight to the following midnight
///
/// Each point is the highest intensity among logs on the day whose
/// `[start, end]` window contains that instant. Logs without a severity
/// never raise a point.
pub fn daily_intensity_curve(logs: &[AttackLog], day: DateKey) -> Vec<HourlyIntensity> {
    let day_start = day.start();
    let day_end = day_start + Duration::days(1);

    let active: Vec<&AttackLog> = logs
        .iter()
        .filter(|log| overlaps(log, day_start, day_end))
        .collect();

    (0..=24u32)
        .map(|hour| {
            let instant = day_start + Duration::hours(hour as i64);
            let intensity = active
                .iter()
                .filter(|log| log.covers(&instant))
                .filter_map(|log| log.intensity())
                .max();

            HourlyIntensity {
                hour,
                label: format!("{}:00", hour),
                intensity,
            }
        })
        .collect()
}

/// Highest point on the curve, if any
pub fn peak_intensity(curve: &[HourlyIntensity]) -> Option<&HourlyIntensity> {
    curve
        .iter()
        .filter(|point| point.intensity.is_some())
        .max_by_key(|point| (point.intensity, std::cmp::Reverse(point.hour)))
}
