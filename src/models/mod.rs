//! Rostering domain models.
//!
//! Provides the core data types for weekly QC test staffing: who can work
//! (employees and shifts), what must be staffed (project groups and their
//! weekly demand), and the placements that connect them.
//!
//! # Domain Mappings
//!
//! | u-roster | QC lab | Maintenance | Warehouse |
//! |----------|--------|-------------|-----------|
//! | Employee | Tester | Technician | Picker |
//! | ProjectGroup | Customer × test type | Line × asset class | Zone × order type |
//! | TestProject | Test run | Work order | Wave |
//! | ScheduleAssignment | Weekly staffing | Crew slot | Shift slot |

mod assignment;
mod employee;
mod project;
mod week;

pub use assignment::{
    propose_assignment, AssignmentCommand, AssignmentKey, AssignmentScope, ScheduleAssignment,
};
pub use employee::{Employee, EmployeeStatus, Shift};
pub use project::{
    group_projects, GroupKey, GroupingMode, ProjectGroup, RequiredTest, TestProject, WeeklyDemand,
};
pub use week::{weeks_in_year, WeekKey};
