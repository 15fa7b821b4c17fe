/// Properties of the derived views over a log collection
use chrono::{Duration, NaiveDate, NaiveDateTime};
use migraine_tracker_mcp::analytics::*;
use migraine_tracker_mcp::*;

fn ts(s: &str) -> NaiveDateTime {
    local_timestamp::parse(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn log_at(start: NaiveDateTime) -> AttackLog {
    AttackLog::new(LogInput::starting_at(start)).unwrap()
}

#[cfg(test)]
mod projection_tests {
    use super::*;

    #[test]
    fn test_severity_buckets_never_exceed_total() {
        let mut logs = vec![
            AttackLog::new(LogInput::quick(DateKey::new(date(2025, 12, 1)), Severity::Mild)).unwrap(),
            AttackLog::new(LogInput::quick(DateKey::new(date(2025, 12, 2)), Severity::Severe)).unwrap(),
        ];
        let month = YearMonth::new(2025, 12).unwrap();

        let counts = monthly_severity_counts(&logs, month);
        assert_eq!(counts.classified(), counts.total);

        logs.push(log_at(ts("2025-12-03T10:00")));
        let counts = monthly_severity_counts(&logs, month);
        assert!(counts.classified() < counts.total);
        assert_eq!(counts.total, 3);
    }

    #[test]
    fn test_severe_attack_curve() {
        let log = AttackLog::new(
            LogInput::starting_at(ts("2025-12-09T09:00"))
                .ending_at(ts("2025-12-09T13:00"))
                .with_severity(Severity::Severe),
        )
        .unwrap();

        let curve = daily_intensity_curve(&[log], DateKey::new(date(2025, 12, 9)));
        let expected: Vec<Option<u8>> = (0..=24)
            .map(|h| if (9..=13).contains(&h) { Some(9) } else { None })
            .collect();
        let actual: Vec<Option<u8>> = curve.iter().map(|p| p.intensity).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_streak_three_days() {
        let today = date(2025, 12, 16);
        let logs = vec![log_at(ts("2025-12-13T23:30"))];
        assert_eq!(pain_free_streak(&logs, today).days(), Some(3));
    }

    #[test]
    fn test_windowed_filter() {
        let now = ts("2025-12-16T12:00");
        let today = log_at(now);
        let ten_days = log_at(now - Duration::days(10));
        let forty_days = log_at(now - Duration::days(40));
        let logs = vec![today.clone(), ten_days.clone(), forty_days.clone()];

        assert_eq!(filter_window(&logs, "Last 7 Days".parse().unwrap(), now), vec![today.clone()]);
        assert_eq!(
            filter_window(&logs, "Last 30 Days".parse().unwrap(), now),
            vec![today.clone(), ten_days.clone()]
        );
        assert_eq!(filter_window(&logs, "All Time".parse().unwrap(), now), logs);
    }

    #[test]
    fn test_trigger_frequency_keeps_stress_on_top() {
        let with = |triggers: Vec<Trigger>| {
            AttackLog::new(LogInput::starting_at(ts("2025-12-09T09:00")).with_triggers(triggers)).unwrap()
        };
        let logs = vec![
            with(vec![Trigger::Stress, Trigger::Light]),
            with(vec![Trigger::Stress]),
            with(vec![Trigger::Noise]),
        ];

        let top = trigger_frequency(&logs, 2);
        assert_eq!(top[0], TriggerCount { trigger: Trigger::Stress, count: 2 });
        assert_eq!(top[1], TriggerCount { trigger: Trigger::Light, count: 1 });
    }

    #[test]
    fn test_empty_collection_never_fails() {
        let now = ts("2025-12-16T12:00");
        let engine = AnalyticsEngine::new();

        let overview = engine.overview(&[], TimeWindow::AllTime, now);
        assert_eq!(overview.total, 0);
        assert_eq!(overview.longest_pain_free_run, 0);

        let status = engine.status(&[], now);
        assert_eq!(status.streak, PainFreeStreak::NoData);
        assert_eq!(status.month.pain_free_days, 31);

        assert!(calendar_map(&[], YearMonth::of(now.date())).is_empty());
    }
}
