/// Derived-view engine: projections over the attack log collection
///
/// Every function here is pure. It takes the collection (or a subset of it)
/// plus a time reference and returns a fresh view, so calling it twice with
/// the same inputs gives the same result. Nothing is cached between calls.

pub mod calendar;
pub mod intensity;
pub mod severity;
pub mod streak;
pub mod trend;
pub mod triggers;
pub mod week;
pub mod window;

pub use calendar::{
    attack_days_in_month, calendar_map, calendar_month, daily_frequency, CalendarDay,
    CalendarMonth, DayCount, YearMonth,
};
pub use intensity::{daily_intensity_curve, peak_intensity, HourlyIntensity};
pub use severity::{
    average_duration_hours, common_severity, monthly_severity_counts, severity_distribution,
    MonthlySeverityCounts, SeverityDistribution, SeveritySlice,
};
pub use streak::{last_attack_label, longest_pain_free_run, pain_free_streak, PainFreeStreak};
pub use trend::{monthly_trend, MonthBucket};
pub use triggers::{trigger_frequency, TriggerCount};
pub use week::{medication_status, week_strip, MedicationStatus, WeekDay};
pub use window::{filter_window, TimeWindow};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{AttackLog, Severity};

/// Number of triggers shown on the dashboard
pub const DEFAULT_TOP_TRIGGERS: usize = 5;
/// Months covered by the dashboard trend
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// The analytics dashboard for one time window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsOverview {
    pub window: TimeWindow,
    pub total: usize,
    /// Whole hours
    pub average_duration_hours: f64,
    pub common_severity: Option<Severity>,
    /// Over the whole history, not just the window
    pub longest_pain_free_run: u32,
    pub severity: SeverityDistribution,
    pub trend: Vec<MonthBucket>,
    pub top_triggers: Vec<TriggerCount>,
}

/// The home screen: streak, this week and this month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub streak: PainFreeStreak,
    pub last_attack: String,
    pub week: Vec<WeekDay>,
    pub month: MonthlySeverityCounts,
}

/// Analytics engine bundling the projections into dashboard views
///
/// Holds only presentation limits; the collection is always passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsEngine {
    top_triggers: usize,
    trend_months: u32,
}

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self {
            top_triggers: DEFAULT_TOP_TRIGGERS,
            trend_months: DEFAULT_TREND_MONTHS,
        }
    }

    pub fn with_limits(top_triggers: usize, trend_months: u32) -> Self {
        Self {
            top_triggers,
            trend_months,
        }
    }

    /// Dashboard figures for the logs inside `window`
    ///
    /// The trend is computed over the windowed subset, so a short window
    /// leaves older trend buckets at zero.
    pub fn overview(&self, logs: &[AttackLog], window: TimeWindow, now: NaiveDateTime) -> AnalyticsOverview {
        let subset = filter_window(logs, window, now);
        let today = now.date();

        AnalyticsOverview {
            window,
            total: subset.len(),
            average_duration_hours: average_duration_hours(&subset),
            common_severity: common_severity(&subset),
            longest_pain_free_run: longest_pain_free_run(logs, today),
            severity: severity_distribution(&subset),
            trend: monthly_trend(&subset, self.trend_months, today),
            top_triggers: trigger_frequency(&subset, self.top_triggers),
        }
    }

    pub fn status(&self, logs: &[AttackLog], now: NaiveDateTime) -> StatusSummary {
        let today = now.date();
        let streak = pain_free_streak(logs, today);

        StatusSummary {
            last_attack: streak.last_attack_line(today),
            streak,
            week: week_strip(logs, today),
            month: monthly_severity_counts(logs, YearMonth::of(today)),
        }
    }

    pub fn calendar(&self, logs: &[AttackLog], month: YearMonth) -> CalendarMonth {
        calendar_month(logs, month)
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
