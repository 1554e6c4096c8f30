//! External collaborator contracts.
//!
//! The planner depends on three outside systems, each behind a trait:
//!
//! - [`PersistenceGateway`]: document store for assignments (`put`/`delete`/`list`).
//! - [`AbsenceLookup`]: the absence calendar, reduced to a yes/no per week.
//! - [`AuditSink`]: history log receiving one [`AuditEvent`] per mutation.
//!
//! In-memory implementations are provided for tests and embedding.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::models::{ScheduleAssignment, Shift, WeekKey};

/// Persistence contract. Each call is atomic per record.
pub trait PersistenceGateway: Send + Sync {
    /// Inserts or replaces an assignment.
    fn put(&self, assignment: &ScheduleAssignment) -> Result<(), GatewayError>;

    /// Deletes an assignment by id.
    fn delete(&self, id: &str) -> Result<(), GatewayError>;

    /// Lists all assignments of a week.
    fn list(&self, week: &WeekKey) -> Result<Vec<ScheduleAssignment>, GatewayError>;
}

/// Absence calendar contract.
pub trait AbsenceLookup: Send + Sync {
    /// Whether the employee is absent at any point of `week`.
    fn is_absent(&self, employee_id: &str, week: &WeekKey) -> bool;
}

/// Mutation kinds recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Create,
    Move,
    Remove,
}

/// One audit log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// What happened.
    pub action: AuditAction,
    /// Display name of the employee.
    pub employee_name: String,
    /// Display name of the project group.
    pub project_name: String,
    /// Shift before the mutation (`None` for Create).
    pub before_shift: Option<Shift>,
    /// Shift after the mutation (`None` for Remove).
    pub after_shift: Option<Shift>,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

/// Audit log contract.
pub trait AuditSink: Send + Sync {
    /// Records an event.
    fn record(&self, event: AuditEvent);
}

/// Absence lookup that never reports an absence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAbsences;

impl AbsenceLookup for NoAbsences {
    fn is_absent(&self, _employee_id: &str, _week: &WeekKey) -> bool {
        false
    }
}

/// Absence lookup backed by an explicit set of `(employee, week)` pairs.
#[derive(Debug, Clone, Default)]
pub struct AbsenceCalendar {
    absences: HashSet<(String, WeekKey)>,
}

impl AbsenceCalendar {
    /// Creates an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an employee absent in `week`.
    pub fn with_absence(mut self, employee_id: impl Into<String>, week: WeekKey) -> Self {
        self.absences.insert((employee_id.into(), week));
        self
    }
}

impl AbsenceLookup for AbsenceCalendar {
    fn is_absent(&self, employee_id: &str, week: &WeekKey) -> bool {
        self.absences.contains(&(employee_id.to_string(), *week))
    }
}

/// Gateway storing assignments in a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    records: Mutex<HashMap<String, ScheduleAssignment>>,
}

impl InMemoryGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether the gateway holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned(id: &str) -> GatewayError {
        GatewayError::WriteFailed {
            id: id.to_string(),
            reason: "store lock poisoned".to_string(),
        }
    }
}

impl PersistenceGateway for InMemoryGateway {
    fn put(&self, assignment: &ScheduleAssignment) -> Result<(), GatewayError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| Self::poisoned(&assignment.id))?;
        records.insert(assignment.id.clone(), assignment.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let mut records = self.records.lock().map_err(|_| Self::poisoned(id))?;
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    fn list(&self, week: &WeekKey) -> Result<Vec<ScheduleAssignment>, GatewayError> {
        let records = self
            .records
            .lock()
            .map_err(|_| GatewayError::ReadFailed("store lock poisoned".to_string()))?;
        let mut listed: Vec<ScheduleAssignment> = records
            .values()
            .filter(|a| a.week == *week)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(listed)
    }
}

/// Audit sink collecting events in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, event: AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Audit sink that discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _event: AuditEvent) {}
}
