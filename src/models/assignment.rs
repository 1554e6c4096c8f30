//! Schedule assignment model.
//!
//! A [`ScheduleAssignment`] places one employee on one project group for
//! one week and shift, covering some [`AssignmentScope`] of the group's work.
//!
//! # Identity
//! Two assignments are duplicates iff their [`AssignmentKey`]s are equal:
//! `(employee, group, week, shift, scope)`, where the scope carries the
//! test or part id for scoped placements.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GroupKey, Shift, WeekKey};

/// Portion of a group's workload an assignment covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssignmentScope {
    /// All tests of the group.
    #[default]
    WholeProject,
    /// Audit tests only.
    AuditOnly,
    /// Peel-off / adhesion tests only.
    AdhesionOnly,
    /// One test, by test id.
    SpecificTest(String),
    /// One part, by part id.
    SpecificPart(String),
}

impl AssignmentScope {
    /// Short label for logs and tooltips.
    pub fn label(&self) -> String {
        match self {
            AssignmentScope::WholeProject => "whole project".to_string(),
            AssignmentScope::AuditOnly => "audit only".to_string(),
            AssignmentScope::AdhesionOnly => "adhesion only".to_string(),
            AssignmentScope::SpecificTest(t) => format!("test {t}"),
            AssignmentScope::SpecificPart(p) => format!("part {p}"),
        }
    }
}

impl fmt::Display for AssignmentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Identity tuple used by the duplicate guard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignmentKey {
    pub employee_id: String,
    pub group_key: GroupKey,
    pub week: WeekKey,
    pub shift: Shift,
    pub scope: AssignmentScope,
}

/// An employee placed on a project group for one week and shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    /// Unique assignment identifier.
    pub id: String,
    /// Assigned employee.
    pub employee_id: String,
    /// Staffed project group.
    pub group_key: GroupKey,
    /// Week of the assignment.
    pub week: WeekKey,
    /// Shift worked.
    pub shift: Shift,
    /// Covered portion of the group's work.
    pub scope: AssignmentScope,
    /// Free-form planner note.
    pub note: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl ScheduleAssignment {
    /// Creates a new assignment with a fresh id and current timestamps.
    pub fn new(
        employee_id: impl Into<String>,
        group_key: GroupKey,
        week: WeekKey,
        shift: Shift,
        scope: AssignmentScope,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.into(),
            group_key,
            week,
            shift,
            scope,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Overrides the id (for records loaded from persistence).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Duplicate-guard identity.
    pub fn key(&self) -> AssignmentKey {
        AssignmentKey {
            employee_id: self.employee_id.clone(),
            group_key: self.group_key.clone(),
            week: self.week,
            shift: self.shift,
            scope: self.scope.clone(),
        }
    }

    /// Whether this assignment places `employee_id` on `group` in `week`.
    #[inline]
    pub fn is_on(&self, employee_id: &str, group: &GroupKey, week: &WeekKey) -> bool {
        self.week == *week && self.group_key == *group && self.employee_id == employee_id
    }
}

/// A placement request from any input mechanism (drag-and-drop, form, API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentCommand {
    pub employee_id: String,
    pub group_key: GroupKey,
    pub week: WeekKey,
    pub shift: Shift,
    pub scope: AssignmentScope,
    pub note: Option<String>,
}

impl AssignmentCommand {
    /// Sets the scope.
    pub fn with_scope(mut self, scope: AssignmentScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Duplicate-guard identity of the assignment this command would create.
    pub fn key(&self) -> AssignmentKey {
        AssignmentKey {
            employee_id: self.employee_id.clone(),
            group_key: self.group_key.clone(),
            week: self.week,
            shift: self.shift,
            scope: self.scope.clone(),
        }
    }

    /// Materializes the command as a new assignment.
    pub fn into_assignment(self) -> ScheduleAssignment {
        let assignment = ScheduleAssignment::new(
            self.employee_id,
            self.group_key,
            self.week,
            self.shift,
            self.scope,
        );
        match self.note {
            Some(note) => assignment.with_note(note),
            None => assignment,
        }
    }
}

/// Proposes a whole-project placement. Pure; nothing is stored.
pub fn propose_assignment(
    employee_id: impl Into<String>,
    group_key: GroupKey,
    week: WeekKey,
    shift: Shift,
) -> AssignmentCommand {
    AssignmentCommand {
        employee_id: employee_id.into(),
        group_key,
        week,
        shift,
        scope: AssignmentScope::WholeProject,
        note: None,
    }
}
