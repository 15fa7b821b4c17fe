/// AttackLog entity for recorded migraine episodes
///
/// This module defines the AttackLog struct (one stored episode) and the
/// LogInput used to create one, together with the validation rules applied
/// at the store boundary.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{lenient_number, lenient_severity, local_timestamp};
use crate::domain::{DateKey, DomainError, DurationUnit, LogId, Medication, Severity, Symptom, Trigger};

/// Longest free-text note accepted on a log
pub const MAX_NOTES_LEN: usize = 2000;

/// One recorded migraine episode
///
/// Field names follow the persisted slot layout (camelCase). Timestamps are
/// local and carry no zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackLog {
    /// Unique identifier, assigned at creation
    pub id: LogId,
    /// When the attack started
    #[serde(with = "local_timestamp")]
    pub start_time: NaiveDateTime,
    /// When the attack ended; absent for instantaneous logging
    #[serde(default, with = "local_timestamp::option", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    /// Absent for meds-only entries
    #[serde(default, deserialize_with = "lenient_severity", skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub duration_value: Option<f64>,
    #[serde(default)]
    pub duration_unit: DurationUnit,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The fields a caller supplies to create a log
///
/// Everything except `start_time` is optional and defaults per the data
/// model; `start_time` is an `Option` only so that a missing value can be
/// rejected with a descriptive error instead of being silently stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogInput {
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub severity: Option<Severity>,
    pub duration_value: Option<f64>,
    pub duration_unit: DurationUnit,
    pub triggers: Vec<Trigger>,
    pub symptoms: Vec<Symptom>,
    pub medications: Vec<Medication>,
    pub notes: Option<String>,
}

impl LogInput {
    pub fn starting_at(start_time: NaiveDateTime) -> Self {
        Self {
            start_time: Some(start_time),
            ..Self::default()
        }
    }

    /// One-tap calendar entry: 09:00 to 13:00 on the given day, four hours
    pub fn quick(day: DateKey, severity: Severity) -> Self {
        let start = day.date().and_time(hour(9));
        Self::starting_at(start)
            .ending_at(day.date().and_time(hour(13)))
            .with_severity(severity)
            .with_duration(4.0, DurationUnit::Hours)
    }

    pub fn ending_at(mut self, end_time: NaiveDateTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_duration(mut self, value: f64, unit: DurationUnit) -> Self {
        self.duration_value = Some(value);
        self.duration_unit = unit;
        self
    }

    pub fn with_triggers<I: IntoIterator<Item = Trigger>>(mut self, triggers: I) -> Self {
        self.triggers = triggers.into_iter().collect();
        self
    }

    pub fn with_symptoms<I: IntoIterator<Item = Symptom>>(mut self, symptoms: I) -> Self {
        self.symptoms = symptoms.into_iter().collect();
        self
    }

    pub fn with_medications<I: IntoIterator<Item = Medication>>(mut self, medications: I) -> Self {
        self.medications = medications.into_iter().collect();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl AttackLog {
    /// Create a new attack log with validation
    ///
    /// This validates the input and assigns a fresh id.
    pub fn new(input: LogInput) -> Result<Self, DomainError> {
        let start_time = input.start_time.ok_or(DomainError::MissingStartTime)?;

        Self::validate_end_time(&start_time, &input.end_time)?;
        Self::validate_duration(&input.duration_value)?;
        Self::validate_notes(&input.notes)?;
        Self::validate_free_text(&input)?;

        Ok(Self {
            id: LogId::new(),
            start_time,
            end_time: input.end_time,
            severity: input.severity,
            duration_value: input.duration_value,
            duration_unit: input.duration_unit,
            triggers: input.triggers.into_iter().map(Trigger::canonical).collect(),
            symptoms: input.symptoms.into_iter().map(Symptom::canonical).collect(),
            medications: input.medications.into_iter().map(Medication::canonical).collect(),
            notes: input.notes,
        })
    }

    /// The fields of this log as an input, id aside
    pub fn to_input(&self) -> LogInput {
        LogInput {
            start_time: Some(self.start_time),
            end_time: self.end_time,
            severity: self.severity,
            duration_value: self.duration_value,
            duration_unit: self.duration_unit,
            triggers: self.triggers.clone(),
            symptoms: self.symptoms.clone(),
            medications: self.medications.clone(),
            notes: self.notes.clone(),
        }
    }

    /// The calendar day this log belongs to
    pub fn day(&self) -> DateKey {
        DateKey::of(&self.start_time)
    }

    pub fn date(&self) -> NaiveDate {
        self.start_time.date()
    }

    /// Check if this log started on the given day
    pub fn is_on(&self, day: DateKey) -> bool {
        day.contains(&self.start_time)
    }

    /// End of the attack window; an absent or inverted end collapses to the start
    pub fn effective_end(&self) -> NaiveDateTime {
        match self.end_time {
            Some(end) if end >= self.start_time => end,
            _ => self.start_time,
        }
    }

    /// Check if the attack window contains the given instant (inclusive)
    pub fn covers(&self, instant: &NaiveDateTime) -> bool {
        *instant >= self.start_time && *instant <= self.effective_end()
    }

    /// Numeric intensity, if the log has a severity
    pub fn intensity(&self) -> Option<u8> {
        self.severity.map(|s| s.intensity())
    }

    /// Duration in hours; a missing value counts as zero
    pub fn duration_hours(&self) -> f64 {
        self.duration_unit.to_hours(self.duration_value.unwrap_or(0.0))
    }

    pub fn took_medication(&self) -> bool {
        !self.medications.is_empty()
    }

    /// Check if this log has notes
    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    // Validation helper methods

    fn validate_end_time(
        start_time: &NaiveDateTime,
        end_time: &Option<NaiveDateTime>,
    ) -> Result<(), DomainError> {
        if let Some(end) = end_time {
            if end < start_time {
                return Err(DomainError::Validation {
                    message: "End time cannot be before the start time".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_duration(duration_value: &Option<f64>) -> Result<(), DomainError> {
        if let Some(value) = duration_value {
            if !value.is_finite() || *value < 0.0 {
                return Err(DomainError::InvalidValue {
                    message: "Duration must be a non-negative number".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_notes(notes: &Option<String>) -> Result<(), DomainError> {
        if let Some(note_text) = notes {
            if note_text.chars().count() > MAX_NOTES_LEN {
                return Err(DomainError::InvalidValue {
                    message: format!("Notes cannot be longer than {} characters", MAX_NOTES_LEN),
                });
            }
        }
        Ok(())
    }

    /// Free-text catalogue entries must say something
    fn validate_free_text(input: &LogInput) -> Result<(), DomainError> {
        let empty_other = input
            .triggers
            .iter()
            .any(|t| t.is_other() && t.display_name().is_empty())
            || input
                .symptoms
                .iter()
                .any(|s| s.is_other() && s.display_name().is_empty())
            || input
                .medications
                .iter()
                .any(|m| m.is_other() && m.display_name().is_empty());

        if empty_other {
            return Err(DomainError::Validation {
                message: "Custom triggers, symptoms and medications cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// First log (in collection order) that started on the given day
pub fn first_on_day(logs: &[AttackLog], day: DateKey) -> Option<&AttackLog> {
    logs.iter().find(|log| log.is_on(day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::local_timestamp;

    fn ts(s: &str) -> NaiveDateTime {
        local_timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_catalogue_entries_survive_serialization() {
        let log = AttackLog::new(
            LogInput::starting_at(ts("2025-12-09T09:00"))
                .with_triggers([Trigger::Other("bright light".to_string())])
                .with_symptoms([Symptom::Other("Aura".to_string())])
                .with_medications([Medication::Other("Paracetamol".to_string())]),
        )
        .unwrap();

        assert_eq!(log.triggers, vec![Trigger::Light]);
        assert_eq!(log.symptoms, vec![Symptom::Aura]);
        assert_eq!(log.medications, vec![Medication::Acetaminophen]);

        let json = serde_json::to_string(&log).unwrap();
        let restored: AttackLog = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, log);
    }

    #[test]
    fn test_create_valid_log() {
        let input = LogInput::starting_at(ts("2025-12-09T09:00"))
            .ending_at(ts("2025-12-09T14:00"))
            .with_severity(Severity::Moderate)
            .with_duration(5.0, DurationUnit::Hours)
            .with_triggers([Trigger::Stress])
            .with_symptoms([Symptom::Nausea])
            .with_notes("Started after a long meeting");

        let log = AttackLog::new(input.clone()).unwrap();
        assert_eq!(log.to_input(), input);
        assert_eq!(log.day(), DateKey::from_ymd(2025, 12, 9).unwrap());
        assert_eq!(log.intensity(), Some(6));
        assert_eq!(log.duration_hours(), 5.0);
        assert!(log.has_notes());
        assert!(!log.took_medication());
    }

    #[test]
    fn test_missing_start_time_rejected() {
        let result = AttackLog::new(LogInput::default());
        assert_eq!(result.unwrap_err(), DomainError::MissingStartTime);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let input = LogInput::starting_at(ts("2025-12-09T09:00")).ending_at(ts("2025-12-09T08:00"));
        assert!(AttackLog::new(input).is_err());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let input = LogInput::starting_at(ts("2025-12-09T09:00")).with_duration(-1.0, DurationUnit::Hours);
        assert!(AttackLog::new(input).is_err());
    }

    #[test]
    fn test_empty_custom_trigger_rejected() {
        let input = LogInput::starting_at(ts("2025-12-09T09:00"))
            .with_triggers([Trigger::Other(String::new())]);
        assert!(AttackLog::new(input).is_err());
    }

    #[test]
    fn test_instantaneous_log_window() {
        let log = AttackLog::new(LogInput::starting_at(ts("2025-12-09T09:00"))).unwrap();
        assert_eq!(log.effective_end(), log.start_time);
        assert!(log.covers(&ts("2025-12-09T09:00")));
        assert!(!log.covers(&ts("2025-12-09T10:00")));
    }

    #[test]
    fn test_quick_entry() {
        let day = DateKey::from_ymd(2025, 12, 16).unwrap();
        let log = AttackLog::new(LogInput::quick(day, Severity::Severe)).unwrap();
        assert_eq!(log.start_time, ts("2025-12-16T09:00"));
        assert_eq!(log.end_time, Some(ts("2025-12-16T13:00")));
        assert_eq!(log.duration_value, Some(4.0));
    }

    #[test]
    fn test_persisted_layout() {
        let json = r#"{
            "id": "sample-1",
            "startTime": "2025-12-09T09:00",
            "endTime": "2025-12-09T14:00",
            "severity": "Moderate",
            "durationValue": 5,
            "triggers": ["Stress"],
            "symptoms": ["Nausea"]
        }"#;
        let log: AttackLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.id, LogId::from_string("sample-1"));
        assert_eq!(log.duration_unit, DurationUnit::Hours);
        assert!(log.medications.is_empty());

        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value["startTime"], "2025-12-09T09:00");
        assert_eq!(value["durationUnit"], "hours");
    }

    #[test]
    fn test_unknown_severity_loads_as_absent() {
        let json = r#"{"id": "x", "startTime": "2025-12-09T09:00", "severity": "Extreme", "durationValue": "2"}"#;
        let log: AttackLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.severity, None);
        assert_eq!(log.duration_value, Some(2.0));
    }

    #[test]
    fn test_first_on_day() {
        let first = AttackLog::new(LogInput::starting_at(ts("2025-12-09T09:00"))).unwrap();
        let second = AttackLog::new(LogInput::starting_at(ts("2025-12-09T18:00"))).unwrap();
        let logs = vec![first.clone(), second];

        let day = DateKey::from_ymd(2025, 12, 9).unwrap();
        assert_eq!(first_on_day(&logs, day).map(|l| &l.id), Some(&first.id));
        assert!(first_on_day(&logs, DateKey::from_ymd(2025, 12, 10).unwrap()).is_none());
    }
}
