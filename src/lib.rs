/// Public library interface for the Migraine Tracker MCP server
///
/// This module exports the attack log store, the derived-view engine and the
/// MCP server that exposes them as tools.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod store;
pub mod tools;

// Re-export public modules and types
pub use analytics::AnalyticsEngine;
pub use domain::*;
pub use mcp::McpServer;
pub use storage::{SlotStorage, SqliteSlotStorage, StorageError, LOGS_SLOT};
pub use store::{DayPolicy, LoadSource, LogStore, StoreConfig, StoreError, StoreEvent};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main migraine tracker server
///
/// Owns the Log Store (backed by a SQLite slot) and the analytics engine
/// that the MCP tools read from.
pub struct MigraineTrackerServer {
    store: LogStore<SqliteSlotStorage>,
    analytics: AnalyticsEngine,
}

impl MigraineTrackerServer {
    /// Create a new server with the specified database path
    ///
    /// This will initialize the SQLite schema if it doesn't already exist
    /// and load (or seed) the attack log collection.
    pub async fn new(db_path: PathBuf, config: StoreConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing Migraine Tracker server with database: {:?}", db_path);

        let storage = SqliteSlotStorage::new(db_path)?;
        Ok(Self::with_storage(storage, config))
    }

    /// A server whose data lives only as long as the process
    pub fn in_memory(config: StoreConfig) -> Result<Self, ServerError> {
        let storage = SqliteSlotStorage::open_in_memory()?;
        Ok(Self::with_storage(storage, config))
    }

    fn with_storage(storage: SqliteSlotStorage, config: StoreConfig) -> Self {
        Self {
            store: LogStore::load(storage, config),
            analytics: AnalyticsEngine::new(),
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(
            "Server started with {} attack log(s) ({:?}, day policy: {})",
            self.store.len(),
            self.store.source(),
            self.store.config().day_policy
        );

        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    pub fn store(&self) -> &LogStore<SqliteSlotStorage> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LogStore<SqliteSlotStorage> {
        &mut self.store
    }

    /// Get a reference to the analytics engine (useful for testing)
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }
}
