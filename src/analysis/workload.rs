//! Workload calculator.
//!
//! Converts a week's assignments into per-employee load.
//!
//! # Algorithm
//! A group's weekly minutes (`Σ required × minutes_per_unit`) are split
//! evenly between the distinct employees assigned to it that week. Each
//! employee receives their share once per group, however many scoped
//! assignments they hold on it; every assignment still counts toward
//! `assignment_count`.
//!
//! Unknown groups, groups without demand and unestimated projects
//! contribute zero minutes.

use std::collections::{HashMap, HashSet};

use crate::models::{GroupKey, ProjectGroup, ScheduleAssignment, WeekKey};

/// Load of one employee in one week.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmployeeLoad {
    /// Planned minutes.
    pub minutes: f64,
    /// Number of assignments held.
    pub assignment_count: usize,
}

/// Computes per-employee workload for `week`.
///
/// Assignments of other weeks are ignored.
pub fn compute_workload(
    week: &WeekKey,
    assignments: &[ScheduleAssignment],
    groups: &[ProjectGroup],
) -> HashMap<String, EmployeeLoad> {
    let groups_by_key: HashMap<&GroupKey, &ProjectGroup> =
        groups.iter().map(|g| (&g.key, g)).collect();

    let in_week: Vec<&ScheduleAssignment> =
        assignments.iter().filter(|a| a.week == *week).collect();

    let mut staff: HashMap<&GroupKey, HashSet<&str>> = HashMap::new();
    for a in &in_week {
        staff
            .entry(&a.group_key)
            .or_default()
            .insert(a.employee_id.as_str());
    }

    let mut loads: HashMap<String, EmployeeLoad> = HashMap::new();
    let mut credited: HashSet<(&str, &GroupKey)> = HashSet::new();

    for a in &in_week {
        let load = loads.entry(a.employee_id.clone()).or_default();
        load.assignment_count += 1;

        if !credited.insert((a.employee_id.as_str(), &a.group_key)) {
            continue;
        }
        let Some(group) = groups_by_key.get(&a.group_key) else {
            continue;
        };
        let sharers = staff.get(&a.group_key).map_or(1, HashSet::len).max(1);
        load.minutes += group.total_minutes(week) / sharers as f64;
    }

    loads
}

/// Minutes per assigned person on `group` in `week`.
///
/// With nobody assigned, returns the group's full minutes.
pub fn group_minutes_per_person(
    week: &WeekKey,
    group: &ProjectGroup,
    assignments: &[ScheduleAssignment],
) -> f64 {
    let assigned = assignments
        .iter()
        .filter(|a| a.week == *week && a.group_key == group.key)
        .map(|a| a.employee_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    group.total_minutes(week) / assigned.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentScope, Shift, TestProject, WeeklyDemand};

    fn w10() -> WeekKey {
        WeekKey::new(2026, 10).unwrap()
    }

    fn group(customer: &str, demands: &[(u32, Option<f64>)]) -> ProjectGroup {
        let mut g = ProjectGroup::new(GroupKey::new(customer, "TypeY"));
        for (i, (required, minutes)) in demands.iter().enumerate() {
            let demand = match minutes {
                Some(m) => WeeklyDemand::new(*required, *m),
                None => WeeklyDemand::unestimated(*required),
            };
            g = g.with_project(
                TestProject::new(format!("P{i}"), customer, "TypeY", format!("T{i}"))
                    .with_demand(w10(), demand),
            );
        }
        g
    }

    fn assign(employee: &str, customer: &str, scope: AssignmentScope) -> ScheduleAssignment {
        ScheduleAssignment::new(
            employee,
            GroupKey::new(customer, "TypeY"),
            w10(),
            Shift::FIRST,
            scope,
        )
    }

    #[test]
    fn test_single_employee_full_load() {
        let groups = vec![group("CustomerX", &[(5, Some(10.0)), (3, Some(20.0))])];
        let assignments = vec![assign("E1", "CustomerX", AssignmentScope::WholeProject)];

        let loads = compute_workload(&w10(), &assignments, &groups);
        assert!((loads["E1"].minutes - 110.0).abs() < 1e-10);
        assert_eq!(loads["E1"].assignment_count, 1);
    }

    #[test]
    fn test_shared_group_splits_load() {
        let groups = vec![group("CustomerX", &[(6, Some(10.0))])];
        let assignments = vec![
            assign("E1", "CustomerX", AssignmentScope::WholeProject),
            assign("E2", "CustomerX", AssignmentScope::AuditOnly),
            assign("E3", "CustomerX", AssignmentScope::AdhesionOnly),
        ];

        let loads = compute_workload(&w10(), &assignments, &groups);
        for id in ["E1", "E2", "E3"] {
            assert!((loads[id].minutes - 20.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_multiple_assignments_same_group_credited_once() {
        let groups = vec![group("CustomerX", &[(4, Some(10.0))])];
        let assignments = vec![
            assign("E1", "CustomerX", AssignmentScope::SpecificTest("T0".into())),
            assign("E1", "CustomerX", AssignmentScope::AuditOnly),
            assign("E2", "CustomerX", AssignmentScope::WholeProject),
        ];

        let loads = compute_workload(&w10(), &assignments, &groups);
        assert!((loads["E1"].minutes - 20.0).abs() < 1e-10);
        assert_eq!(loads["E1"].assignment_count, 2);
        assert!((loads["E2"].minutes - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_contributions() {
        let groups = vec![
            group("Unestimated", &[(5, None)]),
            group("Idle", &[(0, Some(30.0))]),
        ];
        let assignments = vec![
            assign("E1", "Unestimated", AssignmentScope::WholeProject),
            assign("E1", "Idle", AssignmentScope::WholeProject),
            assign("E1", "Unknown", AssignmentScope::WholeProject),
        ];

        let loads = compute_workload(&w10(), &assignments, &groups);
        assert!((loads["E1"].minutes - 0.0).abs() < 1e-10);
        assert_eq!(loads["E1"].assignment_count, 3);
    }

    #[test]
    fn test_other_weeks_ignored() {
        let groups = vec![group("CustomerX", &[(5, Some(10.0))])];
        let mut other = assign("E1", "CustomerX", AssignmentScope::WholeProject);
        other.week = w10().previous();

        let loads = compute_workload(&w10(), &[other], &groups);
        assert!(loads.is_empty());
    }

    #[test]
    fn test_minutes_per_person() {
        let g = group("CustomerX", &[(9, Some(10.0))]);
        assert!((group_minutes_per_person(&w10(), &g, &[]) - 90.0).abs() < 1e-10);

        let assignments = vec![
            assign("E1", "CustomerX", AssignmentScope::WholeProject),
            assign("E2", "CustomerX", AssignmentScope::WholeProject),
            assign("E2", "CustomerX", AssignmentScope::AuditOnly),
        ];
        assert!((group_minutes_per_person(&w10(), &g, &assignments) - 45.0).abs() < 1e-10);
    }
}
