//! Conflict detection for a planned week.
//!
//! Three independent checks, all read-only:
//!
//! | Check | Severity | Remediation |
//! |-------|----------|-------------|
//! | Leave conflict | alert | remove the employee's assignments |
//! | Rotation suggestion | advisory | move to the next shift |
//! | Same-shift overlap | raw data | none (caller policy) |

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::gateway::AbsenceLookup;
use crate::models::{Employee, EmployeeStatus, GroupKey, ScheduleAssignment, Shift, WeekKey};
use crate::store::WeeklyAssignmentStore;

/// Why an employee cannot work the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveReason {
    Vacation,
    Sick,
    /// Marked absent in the absence calendar.
    Absent,
}

/// Suggested fix for a leave conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Remediation {
    /// Remove these assignment ids.
    RemoveAssignments(Vec<String>),
}

/// An employee on leave who still holds assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveConflict {
    pub employee_id: String,
    pub employee_name: String,
    pub reason: LeaveReason,
    /// The conflicting assignments, in store order.
    pub assignments: Vec<ScheduleAssignment>,
    pub remediation: Remediation,
}

impl LeaveConflict {
    /// Ids the remediation would remove.
    pub fn assignment_ids(&self) -> &[String] {
        match &self.remediation {
            Remediation::RemoveAssignments(ids) => ids,
        }
    }
}

fn leave_reason(
    employee: &Employee,
    week: &WeekKey,
    absence: &dyn AbsenceLookup,
) -> Option<LeaveReason> {
    match employee.status {
        EmployeeStatus::Vacation => Some(LeaveReason::Vacation),
        EmployeeStatus::Sick => Some(LeaveReason::Sick),
        EmployeeStatus::Available if absence.is_absent(&employee.id, week) => {
            Some(LeaveReason::Absent)
        }
        EmployeeStatus::Available => None,
    }
}

/// Employees on leave or absent in `week` who hold at least one assignment.
pub fn leave_conflicts(
    week: &WeekKey,
    employees: &[Employee],
    store: &WeeklyAssignmentStore,
    absence: &dyn AbsenceLookup,
) -> Vec<LeaveConflict> {
    employees
        .iter()
        .filter_map(|employee| {
            let reason = leave_reason(employee, week, absence)?;
            let assignments: Vec<ScheduleAssignment> = store
                .for_employee(week, &employee.id)
                .into_iter()
                .cloned()
                .collect();
            if assignments.is_empty() {
                return None;
            }
            warn!(
                employee = %employee.id,
                ?reason,
                count = assignments.len(),
                %week,
                "leave conflict"
            );
            let ids = assignments.iter().map(|a| a.id.clone()).collect();
            Some(LeaveConflict {
                employee_id: employee.id.clone(),
                employee_name: employee.display_name().to_string(),
                reason,
                assignments,
                remediation: Remediation::RemoveAssignments(ids),
            })
        })
        .collect()
}

/// Advice to move an employee who keeps the same group and shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSuggestion {
    pub employee_id: String,
    /// Groups the employee holds in both weeks.
    pub groups: Vec<GroupKey>,
    /// Dominant shift in both weeks.
    pub current_shift: Shift,
    pub suggested_shift: Shift,
}

/// Most frequent shift among `assignments`; ties go to the lower shift.
pub fn dominant_shift<'a>(
    assignments: impl IntoIterator<Item = &'a ScheduleAssignment>,
) -> Option<Shift> {
    let mut counts: BTreeMap<Shift, usize> = BTreeMap::new();
    for a in assignments {
        *counts.entry(a.shift).or_default() += 1;
    }
    // BTreeMap iterates low to high; keep the first maximum
    counts
        .into_iter()
        .fold(None, |best: Option<(Shift, usize)>, (shift, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((shift, n)),
        })
        .map(|(shift, _)| shift)
}

/// Employees stuck on the same group and dominant shift as last week.
///
/// The suggestion is the next shift, wrapping, within
/// `1..=min(shift_system, employee.shift_system)`. Employees limited to a
/// single shift get no suggestion.
pub fn rotation_suggestions(
    week: &WeekKey,
    employees: &[Employee],
    store: &WeeklyAssignmentStore,
    shift_system: u8,
) -> Vec<RotationSuggestion> {
    let previous = week.previous();
    let mut suggestions = Vec::new();

    for employee in employees {
        let max = shift_system.min(employee.shift_system).clamp(1, Shift::MAX);
        if max <= 1 {
            continue;
        }

        let now = store.for_employee(week, &employee.id);
        let before = store.for_employee(&previous, &employee.id);
        let before_groups: BTreeSet<&GroupKey> = before.iter().map(|a| &a.group_key).collect();
        let shared: BTreeSet<&GroupKey> = now
            .iter()
            .map(|a| &a.group_key)
            .filter(|g| before_groups.contains(g))
            .collect();
        if shared.is_empty() {
            continue;
        }

        let (Some(current), Some(last)) = (
            dominant_shift(now.iter().copied()),
            dominant_shift(before.iter().copied()),
        ) else {
            continue;
        };
        if current != last {
            continue;
        }

        let next = current.index() % max + 1;
        let Ok(suggested_shift) = Shift::new(next) else {
            continue;
        };
        suggestions.push(RotationSuggestion {
            employee_id: employee.id.clone(),
            groups: shared.into_iter().cloned().collect(),
            current_shift: current,
            suggested_shift,
        });
    }

    suggestions
}

/// An employee holding several groups in one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SameShiftOverlap {
    pub employee_id: String,
    pub shift: Shift,
    /// Distinct groups, sorted.
    pub groups: Vec<GroupKey>,
}

/// Employees with assignments on two or more groups in the same shift.
///
/// Reported as data only; whether this is a problem is up to the caller.
pub fn same_shift_overlaps(week: &WeekKey, store: &WeeklyAssignmentStore) -> Vec<SameShiftOverlap> {
    let mut by_slot: BTreeMap<(&str, Shift), BTreeSet<&GroupKey>> = BTreeMap::new();
    for a in store.week(week) {
        by_slot
            .entry((a.employee_id.as_str(), a.shift))
            .or_default()
            .insert(&a.group_key);
    }

    by_slot
        .into_iter()
        .filter(|(_, groups)| groups.len() >= 2)
        .map(|((employee_id, shift), groups)| SameShiftOverlap {
            employee_id: employee_id.to_string(),
            shift,
            groups: groups.into_iter().cloned().collect(),
        })
        .collect()
}

/// All conflict checks for one week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub leave: Vec<LeaveConflict>,
    pub rotation: Vec<RotationSuggestion>,
    pub overlaps: Vec<SameShiftOverlap>,
}

impl ConflictReport {
    /// Whether there is anything to act on (overlaps are not counted).
    pub fn has_alerts(&self) -> bool {
        !self.leave.is_empty()
    }

    /// Leave conflicts indexed by employee id.
    pub fn leave_by_employee(&self) -> HashMap<&str, &LeaveConflict> {
        self.leave
            .iter()
            .map(|c| (c.employee_id.as_str(), c))
            .collect()
    }
}

/// Runs every check for `week`.
pub fn detect(
    week: &WeekKey,
    employees: &[Employee],
    store: &WeeklyAssignmentStore,
    absence: &dyn AbsenceLookup,
    shift_system: u8,
) -> ConflictReport {
    ConflictReport {
        leave: leave_conflicts(week, employees, store, absence),
        rotation: rotation_suggestions(week, employees, store, shift_system),
        overlaps: same_shift_overlaps(week, store),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{AbsenceCalendar, NoAbsences};
    use crate::models::AssignmentScope;

    fn w10() -> WeekKey {
        WeekKey::new(2026, 10).unwrap()
    }

    fn assign(employee: &str, group: &str, week: WeekKey, shift: Shift) -> ScheduleAssignment {
        ScheduleAssignment::new(
            employee,
            GroupKey::new(group, "T"),
            week,
            shift,
            AssignmentScope::WholeProject,
        )
    }

    #[test]
    fn test_single_leave_conflict_for_vacation() {
        let employees = vec![
            Employee::new("E1")
                .with_name("Anna")
                .with_status(EmployeeStatus::Vacation),
            Employee::new("E2"),
        ];
        let store = WeeklyAssignmentStore::from_assignments(vec![
            assign("E1", "A", w10(), Shift::FIRST),
            assign("E2", "B", w10(), Shift::FIRST),
            // other weeks never conflict
            assign("E1", "A", w10().next(), Shift::FIRST),
        ]);

        let conflicts = leave_conflicts(&w10(), &employees, &store, &NoAbsences);
        assert_eq!(conflicts.len(), 1);
        let c = &conflicts[0];
        assert_eq!(c.employee_id, "E1");
        assert_eq!(c.employee_name, "Anna");
        assert_eq!(c.reason, LeaveReason::Vacation);
        assert_eq!(c.assignments.len(), 1);
        assert_eq!(c.assignment_ids(), &[c.assignments[0].id.clone()]);
    }

    #[test]
    fn test_absence_and_sick_are_conflicts() {
        let employees = vec![
            Employee::new("E1").with_status(EmployeeStatus::Sick),
            Employee::new("E2"),
            Employee::new("E3").with_status(EmployeeStatus::Vacation),
        ];
        let store = WeeklyAssignmentStore::from_assignments(vec![
            assign("E1", "A", w10(), Shift::FIRST),
            assign("E2", "A", w10(), Shift::SECOND),
            assign("E2", "B", w10(), Shift::SECOND),
        ]);
        let absence = AbsenceCalendar::new().with_absence("E2", w10());

        let conflicts = leave_conflicts(&w10(), &employees, &store, &absence);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].reason, LeaveReason::Sick);
        assert_eq!(conflicts[1].reason, LeaveReason::Absent);
        assert_eq!(conflicts[1].assignment_ids().len(), 2);
    }

    #[test]
    fn test_dominant_shift_ties_go_low() {
        let a = vec![
            assign("E1", "A", w10(), Shift::THIRD),
            assign("E1", "B", w10(), Shift::SECOND),
        ];
        assert_eq!(dominant_shift(&a), Some(Shift::SECOND));

        let b = vec![
            assign("E1", "A", w10(), Shift::THIRD),
            assign("E1", "B", w10(), Shift::THIRD),
            assign("E1", "C", w10(), Shift::FIRST),
        ];
        assert_eq!(dominant_shift(&b), Some(Shift::THIRD));
        assert_eq!(dominant_shift(Vec::<ScheduleAssignment>::new().iter()), None);
    }

    #[test]
    fn test_rotation_suggestion() {
        let prev = w10().previous();
        let employees = vec![
            Employee::new("E1"),
            Employee::new("E2").with_shift_system(2),
            Employee::new("E3"),
            Employee::new("E4").with_shift_system(1),
        ];
        let store = WeeklyAssignmentStore::from_assignments(vec![
            // E1: same group, same shift 3 -> wraps to 1
            assign("E1", "A", prev, Shift::THIRD),
            assign("E1", "A", w10(), Shift::THIRD),
            // E2: same group, shift 2 with two-shift system -> 1
            assign("E2", "B", prev, Shift::SECOND),
            assign("E2", "B", w10(), Shift::SECOND),
            // E3: same group but moved shift -> nothing
            assign("E3", "C", prev, Shift::FIRST),
            assign("E3", "C", w10(), Shift::SECOND),
            // E4: single-shift employee -> nothing
            assign("E4", "D", prev, Shift::FIRST),
            assign("E4", "D", w10(), Shift::FIRST),
        ]);

        let suggestions = rotation_suggestions(&w10(), &employees, &store, 3);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].employee_id, "E1");
        assert_eq!(suggestions[0].current_shift, Shift::THIRD);
        assert_eq!(suggestions[0].suggested_shift, Shift::FIRST);
        assert_eq!(suggestions[0].groups, vec![GroupKey::new("A", "T")]);
        assert_eq!(suggestions[1].employee_id, "E2");
        assert_eq!(suggestions[1].suggested_shift, Shift::FIRST);

        // plant running one shift: nobody can rotate
        assert!(rotation_suggestions(&w10(), &employees, &store, 1).is_empty());
    }

    #[test]
    fn test_rotation_needs_shared_group() {
        let employees = vec![Employee::new("E1")];
        let store = WeeklyAssignmentStore::from_assignments(vec![
            assign("E1", "A", w10().previous(), Shift::FIRST),
            assign("E1", "B", w10(), Shift::FIRST),
        ]);
        assert!(rotation_suggestions(&w10(), &employees, &store, 3).is_empty());
    }

    #[test]
    fn test_same_shift_overlaps() {
        let store = WeeklyAssignmentStore::from_assignments(vec![
            assign("E1", "A", w10(), Shift::FIRST),
            assign("E1", "B", w10(), Shift::FIRST),
            assign("E1", "C", w10(), Shift::SECOND),
            assign("E2", "A", w10(), Shift::FIRST),
        ]);
        let overlaps = same_shift_overlaps(&w10(), &store);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].employee_id, "E1");
        assert_eq!(overlaps[0].shift, Shift::FIRST);
        assert_eq!(
            overlaps[0].groups,
            vec![GroupKey::new("A", "T"), GroupKey::new("B", "T")]
        );
    }

    #[test]
    fn test_detect_bundles_checks() {
        let employees = vec![Employee::new("E1").with_status(EmployeeStatus::Sick)];
        let store = WeeklyAssignmentStore::from_assignments(vec![
            assign("E1", "A", w10(), Shift::FIRST),
            assign("E1", "B", w10(), Shift::FIRST),
        ]);
        let report = detect(&w10(), &employees, &store, &NoAbsences, 3);
        assert!(report.has_alerts());
        assert_eq!(report.overlaps.len(), 1);
        assert!(report.rotation.is_empty());
        assert!(report.leave_by_employee().contains_key("E1"));
    }
}
