/// The Log Store: owner of the canonical attack log collection
///
/// The store keeps the collection in memory, in insertion order, and flushes
/// the whole collection to its slot after every mutation. Loading never
/// fails: a slot that is absent, unreadable or corrupt falls back to the
/// seed set, but only an absent slot is overwritten with it. Records that do
/// not decode are skipped and the raw slot is copied aside first.
/// A failed flush is logged and remembered, while the in-memory collection
/// stays authoritative for the session.

pub mod config;
pub mod seed;

pub use config::{DayPolicy, StoreConfig};

use std::collections::HashSet;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::{first_on_day, AttackLog, DateKey, DomainError, LogId, LogInput};
use crate::storage::{SlotStorage, StorageError};

/// Errors returned by Log Store mutations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Invalid attack log: {0}")]
    Validation(#[from] DomainError),

    #[error("An attack is already logged for {day}")]
    DuplicateDay { day: DateKey },
}

/// Where the collection came from at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Read from the persisted slot
    Persisted,
    /// Nothing usable was persisted; started from the sample records
    Seeded,
    /// Nothing usable was persisted and seeding is disabled
    Empty,
}

/// Change notifications sent to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Reloaded { count: usize, source: LoadSource },
    Added(AttackLog),
    Removed(Vec<AttackLog>),
}

const EVENT_CAPACITY: usize = 64;

/// Appended to the slot name for the copy of unreadable slot contents
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Outcome of reading the slot
enum SlotRead {
    Absent,
    Logs { logs: Vec<AttackLog>, skipped: usize },
    Corrupt,
    Failed,
}

/// Owner of the attack log collection and its persistence
pub struct LogStore<S: SlotStorage> {
    storage: S,
    config: StoreConfig,
    logs: Vec<AttackLog>,
    source: LoadSource,
    persist_failed: bool,
    events: broadcast::Sender<StoreEvent>,
}

impl<S: SlotStorage> LogStore<S> {
    /// Load the collection from storage, falling back to the seed set
    pub fn load(storage: S, config: StoreConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut store = Self {
            storage,
            config,
            logs: Vec::new(),
            source: LoadSource::Empty,
            persist_failed: false,
            events,
        };
        store.read_collection();
        store
    }

    /// Re-read the slot, replacing the in-memory collection
    ///
    /// Unless the slot yields a collection, the current one is kept and no
    /// event is sent. Seeding only ever happens at load time.
    pub fn reload(&mut self) {
        match self.read_slot_logs() {
            SlotRead::Logs { logs, skipped } => self.use_persisted(logs, skipped),
            SlotRead::Absent | SlotRead::Corrupt | SlotRead::Failed => {
                warn!(
                    "Reload found no usable logs in slot '{}'; keeping {} in memory",
                    self.config.slot_name,
                    self.logs.len()
                );
                return;
            }
        }

        info!("Reloaded {} attack log(s)", self.logs.len());
        self.notify(StoreEvent::Reloaded {
            count: self.logs.len(),
            source: self.source,
        });
    }

    /// Validate, store and persist a new log
    ///
    /// A fresh id is always assigned. What happens when the day already has
    /// a log depends on the configured `DayPolicy`.
    pub fn add(&mut self, input: LogInput) -> Result<AttackLog, StoreError> {
        let mut log = AttackLog::new(input)?;
        let day = log.day();

        let replaced = match self.config.day_policy {
            DayPolicy::ReplaceExisting => self.take_day(day),
            DayPolicy::Reject => {
                if self.find_by_day(day).is_some() {
                    return Err(StoreError::DuplicateDay { day });
                }
                Vec::new()
            }
            DayPolicy::AllowMultiple => Vec::new(),
        };

        while self.get(&log.id).is_some() {
            log.id = LogId::new();
        }

        self.logs.push(log.clone());
        self.persist();

        debug!("Added attack log {} for {} (replaced {})", log.id, day, replaced.len());
        if !replaced.is_empty() {
            self.notify(StoreEvent::Removed(replaced));
        }
        self.notify(StoreEvent::Added(log.clone()));

        Ok(log)
    }

    /// Remove every log that started on the given day
    ///
    /// Returns the removed records; an empty result is not an error.
    pub fn delete_by_day(&mut self, day: DateKey) -> Vec<AttackLog> {
        let removed = self.take_day(day);

        if !removed.is_empty() {
            self.persist();
            debug!("Deleted {} attack log(s) for {}", removed.len(), day);
            self.notify(StoreEvent::Removed(removed.clone()));
        }

        removed
    }

    /// Replace whatever is logged for `day` with `input`
    ///
    /// This is the edit operation: it always clears `day` first, whatever the
    /// day policy. If the edited start time moves the log to another day,
    /// that day is subject to the policy as usual.
    pub fn replace_day(&mut self, day: DateKey, input: LogInput) -> Result<AttackLog, StoreError> {
        let log = AttackLog::new(input)?;
        let target = log.day();

        if target != day
            && self.config.day_policy == DayPolicy::Reject
            && self.find_by_day(target).is_some()
        {
            return Err(StoreError::DuplicateDay { day: target });
        }

        let mut removed = self.take_day(day);
        if target != day && self.config.day_policy == DayPolicy::ReplaceExisting {
            removed.extend(self.take_day(target));
        }

        self.logs.push(log.clone());
        self.persist();

        debug!("Replaced {} attack log(s) on {} with {}", removed.len(), day, log.id);
        if !removed.is_empty() {
            self.notify(StoreEvent::Removed(removed));
        }
        self.notify(StoreEvent::Added(log.clone()));

        Ok(log)
    }

    /// First log (in insertion order) that started on the given day
    pub fn find_by_day(&self, day: DateKey) -> Option<&AttackLog> {
        first_on_day(&self.logs, day)
    }

    /// Every log that started on the given day
    pub fn logs_on(&self, day: DateKey) -> Vec<&AttackLog> {
        self.logs.iter().filter(|log| log.is_on(day)).collect()
    }

    pub fn get(&self, id: &LogId) -> Option<&AttackLog> {
        self.logs.iter().find(|log| &log.id == id)
    }

    /// The whole collection, in insertion order
    pub fn logs(&self) -> &[AttackLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    /// Whether the last flush to storage failed
    pub fn persist_failed(&self) -> bool {
        self.persist_failed
    }

    /// Receive a notification for every subsequent change
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Get a reference to the underlying storage (useful for testing)
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // Private helpers

    /// Fill the collection at load time
    ///
    /// Only an absent slot is seeded and flushed. A slot that exists but
    /// could not be read or parsed is left untouched until the next mutation.
    fn read_collection(&mut self) {
        match self.read_slot_logs() {
            SlotRead::Logs { logs, skipped } => self.use_persisted(logs, skipped),
            SlotRead::Absent => self.fall_back(true),
            SlotRead::Corrupt | SlotRead::Failed => self.fall_back(false),
        }

        info!("Loaded {} attack log(s) ({:?})", self.logs.len(), self.source);
    }

    fn read_slot_logs(&self) -> SlotRead {
        let slot = &self.config.slot_name;

        let payload = match self.storage.read_slot(slot) {
            Ok(Some(payload)) => payload,
            Ok(None) => return SlotRead::Absent,
            Err(e) => {
                warn!("Failed to read slot '{}': {}", slot, e);
                return SlotRead::Failed;
            }
        };

        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&payload) {
            Ok(records) => records,
            Err(e) => {
                warn!("Stored attack logs in slot '{}' are unreadable: {}", slot, e);
                self.back_up(&payload);
                return SlotRead::Corrupt;
            }
        };

        let mut logs = Vec::with_capacity(records.len());
        let mut skipped = 0;
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<AttackLog>(record) {
                Ok(log) => logs.push(log),
                Err(e) => {
                    warn!("Skipping unreadable attack log #{} in slot '{}': {}", index, slot, e);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            self.back_up(&payload);
        }

        SlotRead::Logs { logs, skipped }
    }

    fn use_persisted(&mut self, logs: Vec<AttackLog>, skipped: usize) {
        self.logs = logs;
        self.source = LoadSource::Persisted;
        // Rewriting would drop the skipped records from the slot
        if self.ensure_unique_ids() && skipped == 0 {
            self.persist();
        }
    }

    fn fall_back(&mut self, flush: bool) {
        if self.config.seed_when_empty {
            self.logs = seed::sample_logs();
            self.source = LoadSource::Seeded;
            if flush {
                self.persist();
            }
        } else {
            self.logs = Vec::new();
            self.source = LoadSource::Empty;
        }
    }

    /// Keep a copy of a payload that could not be fully loaded
    fn back_up(&self, payload: &str) {
        let backup = format!("{}{}", self.config.slot_name, CORRUPT_SUFFIX);
        match self.storage.write_slot(&backup, payload) {
            Ok(()) => info!("Copied unreadable slot contents to '{}'", backup),
            Err(e) => warn!("Failed to back up slot contents to '{}': {}", backup, e),
        }
    }

    /// Give every repeated id after the first a fresh one; true if any changed
    fn ensure_unique_ids(&mut self) -> bool {
        let mut seen = HashSet::new();
        let mut changed = false;

        for log in &mut self.logs {
            if !seen.insert(log.id.clone()) {
                let fresh = LogId::new();
                warn!("Duplicate attack log id {} reassigned to {}", log.id, fresh);
                log.id = fresh.clone();
                seen.insert(fresh);
                changed = true;
            }
        }

        changed
    }

    fn take_day(&mut self, day: DateKey) -> Vec<AttackLog> {
        let (removed, kept): (Vec<AttackLog>, Vec<AttackLog>) =
            std::mem::take(&mut self.logs).into_iter().partition(|log| log.is_on(day));
        self.logs = kept;
        removed
    }

    fn persist(&mut self) {
        match self.write_collection() {
            Ok(()) => self.persist_failed = false,
            Err(e) => {
                warn!(
                    "Failed to persist {} attack log(s); keeping them in memory: {}",
                    self.logs.len(),
                    e
                );
                self.persist_failed = true;
            }
        }
    }

    fn write_collection(&self) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&self.logs)?;
        self.storage.write_slot(&self.config.slot_name, &payload)
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
