/// Basic unit tests to verify core functionality
use migraine_tracker_mcp::*;
use tempfile::NamedTempFile;

fn ts(s: &str) -> chrono::NaiveDateTime {
    local_timestamp::parse(s).unwrap()
}

fn day(s: &str) -> DateKey {
    DateKey::parse(s).unwrap()
}

fn empty_store() -> LogStore<SqliteSlotStorage> {
    let storage = SqliteSlotStorage::open_in_memory().expect("Failed to open storage");
    LogStore::load(storage, StoreConfig::default().without_seed())
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_attack_log_creation() {
        let log = AttackLog::new(
            LogInput::starting_at(ts("2025-12-09T09:00"))
                .ending_at(ts("2025-12-09T14:00"))
                .with_severity(Severity::Moderate)
                .with_duration(5.0, DurationUnit::Hours)
                .with_triggers([Trigger::Stress])
                .with_symptoms([Symptom::Nausea]),
        );

        assert!(log.is_ok());
        let log = log.unwrap();
        assert_eq!(log.day(), day("2025-12-09"));
        assert_eq!(log.severity, Some(Severity::Moderate));
        assert!(!log.id.as_str().is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = AttackLog::new(LogInput::starting_at(ts("2025-12-09T09:00"))).unwrap();
        let b = AttackLog::new(LogInput::starting_at(ts("2025-12-09T09:00"))).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_catalogue_other_entries() {
        assert_eq!(Trigger::from("bright light"), Trigger::Light);
        assert_eq!(Medication::from("Paracetamol"), Medication::Acetaminophen);

        let custom = Symptom::from("Jaw pain");
        assert!(custom.is_other());
        assert_eq!(custom.to_string(), "Jaw pain");
    }

    #[test]
    fn test_add_then_find_returns_same_fields() {
        let mut store = empty_store();
        let inputs = vec![
            LogInput::quick(day("2025-12-01"), Severity::Mild),
            LogInput::starting_at(ts("2025-12-02T22:15"))
                .ending_at(ts("2025-12-03T03:00"))
                .with_medications([Medication::Triptans, Medication::Other("Ice pack".to_string())])
                .with_notes("Woke up with it"),
            LogInput::starting_at(ts("2025-12-04T07:00")).with_duration(45.0, DurationUnit::Minutes),
        ];

        for input in inputs {
            let start_day = DateKey::of(&input.start_time.unwrap());
            store.add(input.clone()).unwrap();
            let found = store.find_by_day(start_day).expect("log should be found");
            assert_eq!(found.to_input(), input);
        }
    }

    #[test]
    fn test_delete_then_find_is_absent() {
        let mut store = empty_store();
        store.add(LogInput::quick(day("2025-12-09"), Severity::Severe)).unwrap();

        for target in ["2025-12-09", "2025-12-10"] {
            store.delete_by_day(day(target));
            assert!(store.find_by_day(day(target)).is_none());
        }
    }

    #[test]
    fn test_missing_start_time_is_rejected() {
        let mut store = empty_store();
        let err = store.add(LogInput::default()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid attack log: Attack start time is required");
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteSlotStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = MigraineTrackerServer::new(temp_file.path().to_path_buf(), StoreConfig::default()).await;
        assert!(server.is_ok());

        let server = server.unwrap();
        assert_eq!(server.store().source(), LoadSource::Seeded);
        assert_eq!(server.store().len(), 2);
    }
}
