//! In-memory weekly assignment store.
//!
//! Holds every loaded week's assignments for the duration of a planning
//! session and enforces the duplicate guard: no two assignments may share
//! an [`AssignmentKey`]. Earlier weeks double as the history the engine
//! scores against.
//!
//! The store is passed explicitly into every engine call; mutations take
//! `&mut self`, so one owner serializes all writes per week.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{AssignmentKey, GroupKey, ScheduleAssignment, Shift, WeekKey};

/// Result of inserting an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored under the given id.
    Created(String),
    /// Rejected: an assignment with the same key already exists.
    Duplicate { existing_id: String },
}

impl InsertOutcome {
    /// Whether a record was stored.
    pub fn is_created(&self) -> bool {
        matches!(self, InsertOutcome::Created(_))
    }
}

/// Result of moving an assignment to another shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Shift changed.
    Moved { before: Shift, after: Shift },
    /// Already on the requested shift.
    Unchanged,
    /// Rejected: the target shift would duplicate another assignment.
    Duplicate { existing_id: String },
}

/// All loaded assignments, indexed by week.
#[derive(Debug, Clone, Default)]
pub struct WeeklyAssignmentStore {
    weeks: BTreeMap<WeekKey, Vec<ScheduleAssignment>>,
}

impl WeeklyAssignmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from assignments, dropping duplicates (first wins).
    pub fn from_assignments(assignments: impl IntoIterator<Item = ScheduleAssignment>) -> Self {
        let mut store = Self::new();
        for a in assignments {
            store.insert(a);
        }
        store
    }

    /// Replaces one week's assignments (e.g., after reloading from persistence).
    ///
    /// Returns the number of duplicates dropped.
    pub fn replace_week(&mut self, week: WeekKey, assignments: Vec<ScheduleAssignment>) -> usize {
        self.weeks.remove(&week);
        let mut dropped = 0;
        for a in assignments.into_iter().filter(|a| a.week == week) {
            if !self.insert(a).is_created() {
                dropped += 1;
            }
        }
        dropped
    }

    /// Inserts an assignment unless its key is already taken.
    pub fn insert(&mut self, assignment: ScheduleAssignment) -> InsertOutcome {
        if let Some(existing) = self.find_by_key(&assignment.key()) {
            return InsertOutcome::Duplicate {
                existing_id: existing.id.clone(),
            };
        }
        let id = assignment.id.clone();
        self.weeks.entry(assignment.week).or_default().push(assignment);
        InsertOutcome::Created(id)
    }

    /// Finds the assignment holding `key`, if any.
    pub fn find_by_key(&self, key: &AssignmentKey) -> Option<&ScheduleAssignment> {
        self.week(&key.week).iter().find(|a| a.key() == *key)
    }

    /// Looks up an assignment by id.
    pub fn get(&self, id: &str) -> Option<&ScheduleAssignment> {
        self.iter().find(|a| a.id == id)
    }

    /// Moves an assignment to another shift.
    pub fn move_shift(&mut self, id: &str, shift: Shift) -> PlannerResult<MoveOutcome> {
        let current = self
            .get(id)
            .ok_or_else(|| PlannerError::AssignmentNotFound { id: id.to_string() })?;
        let before = current.shift;
        if before == shift {
            return Ok(MoveOutcome::Unchanged);
        }

        let mut target = current.key();
        target.shift = shift;
        if let Some(existing) = self.find_by_key(&target) {
            return Ok(MoveOutcome::Duplicate {
                existing_id: existing.id.clone(),
            });
        }

        let week = target.week;
        if let Some(a) = self
            .weeks
            .get_mut(&week)
            .and_then(|list| list.iter_mut().find(|a| a.id == id))
        {
            a.shift = shift;
            a.updated_at = Utc::now();
        }
        Ok(MoveOutcome::Moved {
            before,
            after: shift,
        })
    }

    /// Removes an assignment by id.
    pub fn remove(&mut self, id: &str) -> PlannerResult<ScheduleAssignment> {
        for list in self.weeks.values_mut() {
            if let Some(pos) = list.iter().position(|a| a.id == id) {
                return Ok(list.remove(pos));
            }
        }
        Err(PlannerError::AssignmentNotFound { id: id.to_string() })
    }

    /// Assignments of one week, in insertion order.
    pub fn week(&self, week: &WeekKey) -> &[ScheduleAssignment] {
        self.weeks.get(week).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All assignments, ordered by week.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduleAssignment> {
        self.weeks.values().flatten()
    }

    /// Loaded weeks, ascending.
    pub fn weeks(&self) -> impl Iterator<Item = &WeekKey> {
        self.weeks.keys()
    }

    /// Total number of assignments.
    pub fn len(&self) -> usize {
        self.weeks.values().map(Vec::len).sum()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assignments of one employee in a week.
    pub fn for_employee(&self, week: &WeekKey, employee_id: &str) -> Vec<&ScheduleAssignment> {
        self.week(week)
            .iter()
            .filter(|a| a.employee_id == employee_id)
            .collect()
    }

    /// Assignments on one group in a week.
    pub fn for_group(&self, week: &WeekKey, group: &GroupKey) -> Vec<&ScheduleAssignment> {
        self.week(week)
            .iter()
            .filter(|a| a.group_key == *group)
            .collect()
    }

    /// Number of distinct employees assigned to a group in a week.
    pub fn staff_count(&self, week: &WeekKey, group: &GroupKey) -> usize {
        self.week(week)
            .iter()
            .filter(|a| a.group_key == *group)
            .map(|a| a.employee_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Whether the employee holds any assignment on the group in the week.
    pub fn has_pairing(&self, week: &WeekKey, employee_id: &str, group: &GroupKey) -> bool {
        self.week(week)
            .iter()
            .any(|a| a.is_on(employee_id, group, week))
    }
}
