/// Time windows for the analytics dashboard

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDateTime};
use serde::Serialize;

use crate::domain::{AttackLog, DomainError};

/// How far back the dashboard looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TimeWindow {
    Last7Days,
    #[default]
    Last30Days,
    Last3Months,
    Last6Months,
    AllTime,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 5] = [
        TimeWindow::Last7Days,
        TimeWindow::Last30Days,
        TimeWindow::Last3Months,
        TimeWindow::Last6Months,
        TimeWindow::AllTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Last7Days => "Last 7 Days",
            TimeWindow::Last30Days => "Last 30 Days",
            TimeWindow::Last3Months => "Last 3 Months",
            TimeWindow::Last6Months => "Last 6 Months",
            TimeWindow::AllTime => "All Time",
        }
    }

    /// Earliest start time inside the window; `None` means no lower bound
    ///
    /// Day windows subtract whole days from `now`. Month windows step back
    /// calendar months, clamping to the end of shorter months.
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            TimeWindow::Last7Days => now.checked_sub_signed(Duration::days(7)),
            TimeWindow::Last30Days => now.checked_sub_signed(Duration::days(30)),
            TimeWindow::Last3Months => now.checked_sub_months(Months::new(3)),
            TimeWindow::Last6Months => now.checked_sub_months(Months::new(6)),
            TimeWindow::AllTime => None,
        }
    }

    pub fn includes(&self, log: &AttackLog, now: NaiveDateTime) -> bool {
        self.cutoff(now).map_or(true, |cutoff| log.start_time >= cutoff)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeWindow {
    type Err = DomainError;

    /// Accepts the dashboard labels and short forms such as `7d`, `3m`, `all`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();

        match normalized.as_str() {
            "last7days" | "7days" | "7d" | "week" => Ok(TimeWindow::Last7Days),
            "last30days" | "30days" | "30d" | "month" => Ok(TimeWindow::Last30Days),
            "last3months" | "3months" | "3m" => Ok(TimeWindow::Last3Months),
            "last6months" | "6months" | "6m" => Ok(TimeWindow::Last6Months),
            "alltime" | "all" => Ok(TimeWindow::AllTime),
            _ => Err(DomainError::InvalidValue {
                message: format!(
                    "Unknown time window '{}'. Valid options: 7d, 30d, 3m, 6m, all",
                    s.trim()
                ),
            }),
        }
    }
}

/// Logs whose start time falls inside the window, in collection order
pub fn filter_window(logs: &[AttackLog], window: TimeWindow, now: NaiveDateTime) -> Vec<AttackLog> {
    logs.iter()
        .filter(|log| window.includes(log, now))
        .cloned()
        .collect()
}
