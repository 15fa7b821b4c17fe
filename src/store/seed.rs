/// Sample records used when nothing usable is persisted

use crate::domain::AttackLog;

const SAMPLE_LOGS: &str = r#"[
    {
        "id": "sample-1",
        "startTime": "2025-12-09T09:00",
        "endTime": "2025-12-09T14:00",
        "severity": "Moderate",
        "durationValue": 5,
        "triggers": ["Stress"],
        "symptoms": ["Nausea"]
    },
    {
        "id": "sample-2",
        "startTime": "2025-12-12T18:00",
        "endTime": "2025-12-12T22:00",
        "severity": "Severe",
        "durationValue": 4,
        "triggers": ["Lights"],
        "symptoms": ["Aura"]
    }
]"#;

/// The fixed seed set, so a first run is not empty
pub fn sample_logs() -> Vec<AttackLog> {
    match serde_json::from_str(SAMPLE_LOGS) {
        Ok(logs) => logs,
        Err(e) => {
            tracing::error!("Sample data failed to parse: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Severity, Symptom, Trigger};

    #[test]
    fn test_sample_logs() {
        let logs = sample_logs();
        assert_eq!(logs.len(), 2);

        assert_eq!(logs[0].id.as_str(), "sample-1");
        assert_eq!(logs[0].severity, Some(Severity::Moderate));
        assert_eq!(logs[0].symptoms, vec![Symptom::Nausea]);

        assert_eq!(logs[1].severity, Some(Severity::Severe));
        assert_eq!(logs[1].triggers, vec![Trigger::Light]);
        assert_eq!(logs[1].duration_hours(), 4.0);
    }
}
