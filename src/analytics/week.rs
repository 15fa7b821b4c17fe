/// The Monday-to-Sunday status strip

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{first_on_day, AttackLog, DateKey, Medication};

/// Whether medication was taken on a day, going by its first log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "medication", rename_all = "snake_case")]
pub enum MedicationStatus {
    NoLog,
    NotTaken,
    /// Carries the first medication listed
    Taken(Medication),
}

impl MedicationStatus {
    pub fn label(&self) -> String {
        match self {
            MedicationStatus::NoLog => "No log".to_string(),
            MedicationStatus::NotTaken => "Not taken".to_string(),
            MedicationStatus::Taken(first) => format!("Taken ({})", first),
        }
    }
}

pub fn medication_status(logs: &[AttackLog], day: DateKey) -> MedicationStatus {
    match first_on_day(logs, day) {
        None => MedicationStatus::NoLog,
        Some(log) => match log.medications.first() {
            Some(first) => MedicationStatus::Taken(first.clone()),
            None => MedicationStatus::NotTaken,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    pub day: DateKey,
    /// e.g. "Mon"
    pub weekday: String,
    pub has_log: bool,
    pub medication: MedicationStatus,
}

/// The seven days of `reference`'s week, starting on Monday
pub fn week_strip(logs: &[AttackLog], reference: NaiveDate) -> Vec<WeekDay> {
    let monday = reference - Duration::days(reference.weekday().num_days_from_monday() as i64);

    monday
        .iter_days()
        .take(7)
        .map(|date| {
            let day = DateKey::new(date);
            WeekDay {
                day,
                weekday: date.format("%a").to_string(),
                has_log: first_on_day(logs, day).is_some(),
                medication: medication_status(logs, day),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LogInput, Severity};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2025-12-14 is a Sunday
        let strip = week_strip(&[], date(2025, 12, 14));
        assert_eq!(strip.len(), 7);
        assert_eq!(strip[0].day.date(), date(2025, 12, 8));
        assert_eq!(strip[0].weekday, "Mon");
        assert_eq!(strip[6].day.date(), date(2025, 12, 14));
        assert!(strip.iter().all(|d| d.medication == MedicationStatus::NoLog));
    }

    #[test]
    fn test_medication_status() {
        let with_meds = LogInput::quick(DateKey::new(date(2025, 12, 9)), Severity::Mild)
            .with_medications([Medication::Triptans, Medication::Nsaids]);
        let without_meds = LogInput::quick(DateKey::new(date(2025, 12, 10)), Severity::Mild);
        let logs = vec![
            AttackLog::new(with_meds).unwrap(),
            AttackLog::new(without_meds).unwrap(),
        ];

        let strip = week_strip(&logs, date(2025, 12, 9));
        assert!(strip[1].has_log);
        assert_eq!(strip[1].medication, MedicationStatus::Taken(Medication::Triptans));
        assert_eq!(strip[1].medication.label(), "Taken (Triptans)");
        assert_eq!(strip[2].medication, MedicationStatus::NotTaken);
        assert_eq!(strip[3].medication.label(), "No log");
    }
}
