//! Error types.
//!
//! Engine runs never fail for "nothing to do" or "no candidate" situations;
//! those are reported through [`RunSummary`](crate::engine::RunSummary).
//! Errors here cover malformed input, unknown references and persistence.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Top-level planner error.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Week string or (year, week) pair is not a valid ISO week.
    #[error("invalid ISO week: {0}")]
    InvalidWeek(String),

    /// Shift index outside 1..=3.
    #[error("invalid shift {0}: expected 1, 2 or 3")]
    InvalidShift(u8),

    /// No assignment with this id is held in memory.
    #[error("assignment not found: {id}")]
    AssignmentNotFound { id: String },

    /// Employee id not present in the planning session.
    #[error("unknown employee: {id}")]
    UnknownEmployee { id: String },

    /// Group key not present in the planning session.
    #[error("unknown project group: {key}")]
    UnknownGroup { key: String },

    /// Persistence write or read failed. In-memory state is not rolled back.
    #[error("persistence failure: {0}")]
    Gateway(#[from] GatewayError),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Failure reported by a [`PersistenceGateway`](crate::gateway::PersistenceGateway).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backing store rejected or failed the write.
    #[error("write failed for {id}: {reason}")]
    WriteFailed { id: String, reason: String },

    /// The backing store could not be read.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// The record does not exist in the backing store.
    #[error("record not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::Config(err.to_string())
    }
}
