/// SQLite implementation of the slot storage interface
///
/// Each slot is one row keyed by name; writes replace the whole payload.

use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::storage::{migrations, SlotStorage, StorageError};

/// SQLite-based slot storage
pub struct SqliteSlotStorage {
    conn: Connection,
}

impl SqliteSlotStorage {
    /// Open (or create) the database file and bring its schema up to date
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite slot storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// A private in-memory database, discarded on drop
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }
}

impl SlotStorage for SqliteSlotStorage {
    fn read_slot(&self, name: &str) -> Result<Option<String>, StorageError> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM slots WHERE name = ?1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(payload)
    }

    fn write_slot(&self, name: &str, payload: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (name, payload, updated_at) VALUES (?1, ?2, ?3)",
            params![name, payload, Utc::now()],
        )?;

        tracing::debug!("Wrote slot '{}' ({} bytes)", name, payload.len());
        Ok(())
    }

    fn clear_slot(&self, name: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM slots WHERE name = ?1", params![name])?;

        tracing::debug!("Cleared slot '{}'", name);
        Ok(())
    }
}
