/// Basic integration tests
use migraine_tracker_mcp::*;
use tempfile::NamedTempFile;

fn day(s: &str) -> DateKey {
    DateKey::parse(s).unwrap()
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_database_is_seeded_and_persisted() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let server = MigraineTrackerServer::new(db_path.clone(), StoreConfig::default())
            .await
            .expect("Failed to create server");
        assert_eq!(server.store().source(), LoadSource::Seeded);
        assert!(server.store().find_by_day(day("2025-12-09")).is_some());
        drop(server);

        let reopened = MigraineTrackerServer::new(db_path, StoreConfig::default())
            .await
            .expect("Failed to reopen server");
        assert_eq!(reopened.store().source(), LoadSource::Persisted);
        assert_eq!(reopened.store().len(), 2);
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();
        let config = StoreConfig::default().without_seed();

        let mut server = MigraineTrackerServer::new(db_path.clone(), config.clone())
            .await
            .expect("Failed to create server");
        assert!(server.store().is_empty());

        let logged = server
            .store_mut()
            .add(
                LogInput::quick(day("2025-11-20"), Severity::Severe)
                    .with_triggers([Trigger::PoorSleep])
                    .with_medications([Medication::Triptans]),
            )
            .expect("Failed to add log");
        assert!(!server.store().persist_failed());
        drop(server);

        let reopened = MigraineTrackerServer::new(db_path, config)
            .await
            .expect("Failed to reopen server");
        let found = reopened
            .store()
            .find_by_day(day("2025-11-20"))
            .expect("log should survive a restart");
        assert_eq!(found, &logged);
    }

    #[tokio::test]
    async fn test_bad_record_does_not_wipe_stored_logs() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let storage = SqliteSlotStorage::new(db_path.clone()).expect("Failed to open storage");
        storage
            .write_slot(
                LOGS_SLOT,
                r#"[{"id":"mine","startTime":"2025-11-01T09:00","severity":"Moderate"},{"id":"bad","startTime":"11/02/2025"}]"#,
            )
            .expect("Failed to write slot");
        drop(storage);

        let server = MigraineTrackerServer::new(db_path.clone(), StoreConfig::default())
            .await
            .expect("Failed to create server");
        assert_eq!(server.store().source(), LoadSource::Persisted);
        assert_eq!(server.store().len(), 1);
        drop(server);

        let storage = SqliteSlotStorage::new(db_path).expect("Failed to open storage");
        let slot = storage.read_slot(LOGS_SLOT).unwrap().unwrap();
        assert!(slot.contains("\"mine\""));
        assert!(!slot.contains("sample-1"));
    }

    #[tokio::test]
    async fn test_cleared_day_stays_cleared() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let mut server = MigraineTrackerServer::new(db_path.clone(), StoreConfig::default())
            .await
            .expect("Failed to create server");
        let removed = server.store_mut().delete_by_day(day("2025-12-12"));
        assert_eq!(removed.len(), 1);
        drop(server);

        let reopened = MigraineTrackerServer::new(db_path, StoreConfig::default())
            .await
            .expect("Failed to reopen server");
        assert_eq!(reopened.store().len(), 1);
        assert!(reopened.store().find_by_day(day("2025-12-12")).is_none());
    }

    #[tokio::test]
    async fn test_users_have_separate_collections() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();
        let alice = StoreConfig::default().without_seed().for_user("alice");
        let bob = StoreConfig::default().without_seed().for_user("bob");

        let mut server = MigraineTrackerServer::new(db_path.clone(), alice.clone())
            .await
            .expect("Failed to create server");
        server
            .store_mut()
            .add(LogInput::quick(day("2025-12-01"), Severity::Mild))
            .expect("Failed to add log");
        drop(server);

        let other = MigraineTrackerServer::new(db_path.clone(), bob)
            .await
            .expect("Failed to create server");
        assert!(other.store().is_empty());
        drop(other);

        let again = MigraineTrackerServer::new(db_path, alice)
            .await
            .expect("Failed to reopen server");
        assert_eq!(again.store().len(), 1);
    }

    #[tokio::test]
    async fn test_analytics_over_stored_logs() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = MigraineTrackerServer::new(temp_file.path().to_path_buf(), StoreConfig::default())
            .await
            .expect("Failed to create server");

        let now = local_timestamp::parse("2025-12-16T12:00").unwrap();
        let overview = server
            .analytics()
            .overview(server.store().logs(), analytics::TimeWindow::Last30Days, now);

        assert_eq!(overview.total, 2);
        assert_eq!(overview.common_severity, Some(Severity::Severe));
        assert_eq!(overview.average_duration_hours, 5.0);
    }
}
