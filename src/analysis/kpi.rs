//! Weekly planning metrics (KPIs).
//!
//! Summarizes a planned week from its groups, employees and assignments.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Coverage rate | Full groups / groups with demand |
//! | Planned minutes | Σ group minutes over groups with demand |
//! | Staffed minutes | Σ employee minutes from the workload calculator |
//! | Assignment spread | max − min assignment count among available employees |
//! | Avg minutes | Mean staffed minutes per available employee |

use std::collections::HashMap;

use super::coverage::{staffing_status, CoverageLevel, TestClassifier};
use super::workload::compute_workload;
use crate::models::{Employee, ProjectGroup, ScheduleAssignment, WeekKey};

/// Week performance indicators.
#[derive(Debug, Clone)]
pub struct WeekKpi {
    /// Week evaluated.
    pub week: WeekKey,
    /// Groups classified Full.
    pub full_groups: usize,
    /// Groups classified Partial.
    pub partial_groups: usize,
    /// Groups classified None.
    pub unstaffed_groups: usize,
    /// Fraction of groups with demand that are Full (1.0 if none have demand).
    pub coverage_rate: f64,
    /// Σ planned minutes of groups with demand.
    pub planned_minutes: f64,
    /// Σ minutes credited to employees.
    pub staffed_minutes: f64,
    /// Minutes per employee (employees with assignments only).
    pub minutes_by_employee: HashMap<String, f64>,
    /// max − min weekly assignment count among available employees.
    pub assignment_spread: usize,
    /// Mean staffed minutes over available employees.
    pub avg_minutes_per_employee: f64,
}

impl WeekKpi {
    /// Computes KPIs for `week`.
    pub fn calculate(
        week: &WeekKey,
        groups: &[ProjectGroup],
        employees: &[Employee],
        assignments: &[ScheduleAssignment],
        classifier: &dyn TestClassifier,
    ) -> Self {
        let mut full = 0;
        let mut partial = 0;
        let mut none = 0;
        let mut planned_minutes = 0.0;

        for group in groups.iter().filter(|g| g.has_demand(week)) {
            planned_minutes += group.total_minutes(week);
            match staffing_status(group, week, assignments, classifier).level {
                CoverageLevel::Full => full += 1,
                CoverageLevel::Partial => partial += 1,
                CoverageLevel::None => none += 1,
            }
        }

        let with_demand = full + partial + none;
        let coverage_rate = if with_demand == 0 {
            1.0
        } else {
            full as f64 / with_demand as f64
        };

        let loads = compute_workload(week, assignments, groups);
        let staffed_minutes: f64 = loads.values().map(|l| l.minutes).sum();
        let minutes_by_employee: HashMap<String, f64> = loads
            .iter()
            .map(|(id, l)| (id.clone(), l.minutes))
            .collect();

        let available: Vec<&Employee> = employees.iter().filter(|e| e.is_available()).collect();
        let counts: Vec<usize> = available
            .iter()
            .map(|e| loads.get(&e.id).map_or(0, |l| l.assignment_count))
            .collect();
        let assignment_spread = match (counts.iter().max(), counts.iter().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        };

        let avg_minutes_per_employee = if available.is_empty() {
            0.0
        } else {
            let sum: f64 = available
                .iter()
                .map(|e| loads.get(&e.id).map_or(0.0, |l| l.minutes))
                .sum();
            sum / available.len() as f64
        };

        Self {
            week: *week,
            full_groups: full,
            partial_groups: partial,
            unstaffed_groups: none,
            coverage_rate,
            planned_minutes,
            staffed_minutes,
            minutes_by_employee,
            assignment_spread,
            avg_minutes_per_employee,
        }
    }

    /// Whether the week meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_coverage: f64, max_spread: usize) -> bool {
        self.coverage_rate >= min_coverage && self.assignment_spread <= max_spread
    }
}
