/// Monthly attack trend

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::calendar::YearMonth;
use crate::domain::AttackLog;

/// Attack count for one month of the trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub month: YearMonth,
    /// e.g. "Dec 2025"
    pub label: String,
    pub count: usize,
}

/// The last `months_back` calendar months ending with `today`'s, oldest first
///
/// Logs outside those months are ignored.
pub fn monthly_trend(logs: &[AttackLog], months_back: u32, today: NaiveDate) -> Vec<MonthBucket> {
    let current = YearMonth::of(today);

    let mut buckets: Vec<MonthBucket> = (0..months_back)
        .rev()
        .map(|n| {
            let month = current.months_before(n);
            MonthBucket {
                month,
                label: month.short_label(),
                count: 0,
            }
        })
        .collect();

    for log in logs {
        let month = YearMonth::of(log.date());
        if let Some(bucket) = buckets.iter_mut().find(|b| b.month == month) {
            bucket.count += 1;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{local_timestamp, LogInput};

    fn log(start: &str) -> AttackLog {
        AttackLog::new(LogInput::starting_at(local_timestamp::parse(start).unwrap())).unwrap()
    }

    #[test]
    fn test_six_month_trend() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let logs = vec![
            log("2025-12-09T09:00"),
            log("2025-12-12T18:00"),
            log("2026-02-01T07:00"),
            log("2025-06-30T07:00"),
        ];

        let trend = monthly_trend(&logs, 6, today);
        let labels: Vec<&str> = trend.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Sep 2025", "Oct 2025", "Nov 2025", "Dec 2025", "Jan 2026", "Feb 2026"]
        );

        let counts: Vec<usize> = trend.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 0, 0, 2, 0, 1]);
    }

    #[test]
    fn test_same_month_in_different_years_does_not_collide() {
        let today = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        let logs = vec![log("2025-12-09T09:00"), log("2026-12-01T09:00")];

        let trend = monthly_trend(&logs, 13, today);
        assert_eq!(trend.len(), 13);
        assert_eq!(trend[0].label, "Dec 2025");
        assert_eq!(trend[0].count, 1);
        assert_eq!(trend[12].label, "Dec 2026");
        assert_eq!(trend[12].count, 1);
    }
}
