//! Shift-constrained planning ("Shift Planner").
//!
//! The operator fixes, per group, the shifts it runs on and, per employee,
//! the one shift they work this week. A candidate is eligible only when
//! their fixed shift is one of the group's shifts. There is no cross-shift
//! fallback: a group without a matching candidate stays unstaffed.
//!
//! # Night Exception
//! A group that runs on shift 3 only is a separate night rotation: any
//! employee whose shift system reaches 3 may fill it, whatever their fixed
//! shift, and the placement is forced to shift 3.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::shift::{clamp_for, ShiftPolicy};
use crate::models::{Employee, GroupKey, ProjectGroup, Shift, WeekKey};
use crate::store::WeeklyAssignmentStore;

/// Operator input for a shift-constrained run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftPlan {
    /// Shifts each group runs on.
    pub group_shifts: HashMap<GroupKey, BTreeSet<Shift>>,
    /// Fixed shift of each employee for the week.
    pub employee_shifts: HashMap<String, Shift>,
}

impl ShiftPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shifts a group runs on.
    pub fn with_group_shifts(
        mut self,
        group: GroupKey,
        shifts: impl IntoIterator<Item = Shift>,
    ) -> Self {
        self.group_shifts.insert(group, shifts.into_iter().collect());
        self
    }

    /// Sets an employee's fixed shift.
    pub fn with_employee_shift(mut self, employee_id: impl Into<String>, shift: Shift) -> Self {
        self.employee_shifts.insert(employee_id.into(), shift);
        self
    }

    /// Whether the group is configured to run on at least one shift.
    pub fn is_configured(&self, group: &GroupKey) -> bool {
        self.group_shifts.get(group).is_some_and(|s| !s.is_empty())
    }

    fn is_night_only(shifts: &BTreeSet<Shift>) -> bool {
        shifts.len() == 1 && shifts.contains(&Shift::THIRD)
    }
}

impl ShiftPolicy for ShiftPlan {
    fn shift_for(
        &self,
        employee: &Employee,
        group: &ProjectGroup,
        _week: &WeekKey,
        _store: &WeeklyAssignmentStore,
    ) -> Option<Shift> {
        let allowed = self.group_shifts.get(&group.key).filter(|s| !s.is_empty())?;
        let fixed = self
            .employee_shifts
            .get(&employee.id)
            .map(|s| clamp_for(employee, *s));

        match fixed {
            Some(shift) if allowed.contains(&shift) => Some(shift),
            _ if Self::is_night_only(allowed) && employee.shift_system >= Shift::MAX => {
                Some(Shift::THIRD)
            }
            _ => {
                debug!(
                    employee = %employee.id,
                    group = %group.key,
                    fixed = ?fixed.map(|s| s.index()),
                    "fixed shift not run by group"
                );
                None
            }
        }
    }
}
