/// Storage layer for persisting the attack log collection
///
/// The collection is kept in a single named slot holding the serialized
/// array, written in full on every mutation. This module defines that slot
/// interface and its SQLite implementation.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

/// Name of the slot holding the attack log collection
pub const LOGS_SLOT: &str = "migraine_logs";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the persisted-slot interface
///
/// A slot is a named text payload. Keying the slot name by user identity is
/// how several users could share one database.
pub trait SlotStorage {
    /// Read a slot; `None` if it has never been written
    fn read_slot(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Replace a slot's payload
    fn write_slot(&self, name: &str, payload: &str) -> Result<(), StorageError>;

    /// Remove a slot entirely
    fn clear_slot(&self, name: &str) -> Result<(), StorageError>;
}
