/// Domain module containing the attack log model and its validation rules
///
/// This module defines the core entities (AttackLog, LogInput) and the small
/// value types they are built from. Everything here is pure data plus
/// validation; persistence lives in `storage` and `store`.

pub mod attack;
pub mod catalogue;
pub mod types;

// Re-export public types for easy access
pub use attack::*;
pub use catalogue::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Attack start time is required")]
    MissingStartTime,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid severity '{0}'. Valid options: Mild, Moderate, Severe")]
    InvalidSeverity(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
