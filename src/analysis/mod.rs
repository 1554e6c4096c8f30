//! Workload, coverage and KPI evaluation.
//!
//! Pure functions over a week's assignments: nothing here mutates state.
//!
//! - [`compute_workload`]: per-employee minutes and assignment counts.
//! - [`staffing_status`]: Full / Partial / None classification of a group.
//! - [`WeekKpi`]: week-level coverage rate and load spread.

mod coverage;
mod kpi;
mod workload;

pub use coverage::{
    staffing_status, staffing_status_with_limit, week_coverage, CoverageLevel, CoverageStatus,
    KeywordClassifier, TestClassifier, DEFAULT_MAX_MISSING,
};
pub use kpi::WeekKpi;
pub use workload::{compute_workload, group_minutes_per_person, EmployeeLoad};
