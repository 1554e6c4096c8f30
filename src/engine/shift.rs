//! Shift selection for new placements.

use std::fmt::Debug;

use tracing::warn;

use crate::models::{Employee, ProjectGroup, Shift, WeekKey};
use crate::store::WeeklyAssignmentStore;

/// Decides the shift of a placement, or that the employee cannot be
/// placed on the group at all.
pub trait ShiftPolicy: Send + Sync + Debug {
    /// Shift for `employee` on `group`, `None` if ineligible.
    fn shift_for(
        &self,
        employee: &Employee,
        group: &ProjectGroup,
        week: &WeekKey,
        store: &WeeklyAssignmentStore,
    ) -> Option<Shift>;
}

/// Least-loaded shift within `1..=min(shift_system, employee.shift_system)`.
///
/// A preferred shift within range always wins. Load is the number of
/// assignments on that shift in the week; ties go to the lower shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeastLoadedShift {
    /// Plant-wide shift system of the run.
    pub shift_system: u8,
}

impl LeastLoadedShift {
    /// Creates the policy.
    pub fn new(shift_system: u8) -> Self {
        Self { shift_system }
    }
}

impl ShiftPolicy for LeastLoadedShift {
    fn shift_for(
        &self,
        employee: &Employee,
        _group: &ProjectGroup,
        week: &WeekKey,
        store: &WeeklyAssignmentStore,
    ) -> Option<Shift> {
        let max = self.shift_system.min(employee.shift_system);

        if let Some(preferred) = employee.preferred_shift {
            if preferred.index() <= max {
                return Some(preferred);
            }
        }

        let assignments = store.week(week);
        let chosen = Shift::up_to(max)
            .min_by_key(|s| {
                let load = assignments.iter().filter(|a| a.shift == *s).count();
                (load, s.index())
            })
            .unwrap_or(Shift::FIRST);

        Some(clamp_for(employee, chosen))
    }
}

/// Clamps `shift` to 1 when it exceeds the employee's shift system.
pub(crate) fn clamp_for(employee: &Employee, shift: Shift) -> Shift {
    let clamped = shift.clamp_to(employee.shift_system);
    if clamped != shift {
        warn!(
            employee = %employee.id,
            requested = shift.index(),
            shift_system = employee.shift_system,
            "shift exceeds employee shift system, clamped to 1"
        );
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentScope, GroupKey, ScheduleAssignment};

    fn w10() -> WeekKey {
        WeekKey::new(2026, 10).unwrap()
    }

    fn group() -> ProjectGroup {
        ProjectGroup::new(GroupKey::new("C", "T"))
    }

    fn on_shift(employee: &str, shift: Shift) -> ScheduleAssignment {
        ScheduleAssignment::new(
            employee,
            GroupKey::new("Other", "T"),
            w10(),
            shift,
            AssignmentScope::WholeProject,
        )
    }

    #[test]
    fn test_empty_week_picks_first_shift() {
        let store = WeeklyAssignmentStore::new();
        let policy = LeastLoadedShift::new(3);
        let e = Employee::new("E1");
        assert_eq!(policy.shift_for(&e, &group(), &w10(), &store), Some(Shift::FIRST));
    }

    #[test]
    fn test_picks_least_loaded_within_range() {
        let store = WeeklyAssignmentStore::from_assignments(vec![
            on_shift("X1", Shift::FIRST),
            on_shift("X2", Shift::FIRST),
            on_shift("X3", Shift::SECOND),
        ]);
        let policy = LeastLoadedShift::new(3);

        let three = Employee::new("E1").with_shift_system(3);
        assert_eq!(policy.shift_for(&three, &group(), &w10(), &store), Some(Shift::THIRD));

        let two = Employee::new("E2").with_shift_system(2);
        assert_eq!(policy.shift_for(&two, &group(), &w10(), &store), Some(Shift::SECOND));

        let global_one = LeastLoadedShift::new(1);
        assert_eq!(
            global_one.shift_for(&three, &group(), &w10(), &store),
            Some(Shift::FIRST)
        );
    }

    #[test]
    fn test_preferred_shift_honored_in_range() {
        let store = WeeklyAssignmentStore::from_assignments(vec![on_shift("X1", Shift::SECOND)]);
        let policy = LeastLoadedShift::new(3);

        let e = Employee::new("E1").with_preferred_shift(Shift::SECOND);
        assert_eq!(policy.shift_for(&e, &group(), &w10(), &store), Some(Shift::SECOND));

        let out_of_range = Employee::new("E2")
            .with_shift_system(1)
            .with_preferred_shift(Shift::THIRD);
        assert_eq!(
            policy.shift_for(&out_of_range, &group(), &w10(), &store),
            Some(Shift::FIRST)
        );
    }

    #[test]
    fn test_clamp_for() {
        let e = Employee::new("E1").with_shift_system(2);
        assert_eq!(clamp_for(&e, Shift::THIRD), Shift::FIRST);
        assert_eq!(clamp_for(&e, Shift::SECOND), Shift::SECOND);
    }
}
