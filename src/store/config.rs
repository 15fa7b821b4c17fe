/// Log Store options

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::domain::DomainError;
use crate::storage::LOGS_SLOT;

/// What `add` does when the new log's day already has one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DayPolicy {
    /// Delete the day's existing logs first (last write wins per day)
    #[default]
    #[value(name = "replace")]
    ReplaceExisting,
    /// Refuse the insert
    Reject,
    /// Keep every log; several attacks may share a day
    AllowMultiple,
}

impl DayPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            DayPolicy::ReplaceExisting => "replace",
            DayPolicy::Reject => "reject",
            DayPolicy::AllowMultiple => "allow-multiple",
        }
    }
}

impl fmt::Display for DayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" | "replace-existing" => Ok(DayPolicy::ReplaceExisting),
            "reject" => Ok(DayPolicy::Reject),
            "allow-multiple" | "multiple" => Ok(DayPolicy::AllowMultiple),
            other => Err(DomainError::Validation {
                message: format!(
                    "Invalid day policy '{}'. Valid options: replace, reject, allow-multiple",
                    other
                ),
            }),
        }
    }
}

/// Configuration for a LogStore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub day_policy: DayPolicy,
    /// Start from the sample records when nothing usable is persisted
    pub seed_when_empty: bool,
    /// Slot holding the collection
    pub slot_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            day_policy: DayPolicy::default(),
            seed_when_empty: true,
            slot_name: LOGS_SLOT.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_day_policy(mut self, day_policy: DayPolicy) -> Self {
        self.day_policy = day_policy;
        self
    }

    pub fn without_seed(mut self) -> Self {
        self.seed_when_empty = false;
        self
    }

    /// Keep this user's collection in its own slot
    pub fn for_user(mut self, user: &str) -> Self {
        self.slot_name = format!("{}:{}", LOGS_SLOT, user);
        self
    }
}
