//! Weekly shift-assignment engine for QC test staffing.
//!
//! Decides, for each ISO week, which employee covers which test-project
//! group on which shift, balancing workload, rotating people across groups,
//! and honoring shift limits and absences.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Employee`, `Shift`, `WeekKey`,
//!   `TestProject`, `ProjectGroup`, `ScheduleAssignment`, `AssignmentScope`
//! - **`store`**: In-memory weekly assignment set with the duplicate guard
//! - **`analysis`**: Workload, coverage (Full / Partial / None) and KPIs
//! - **`engine`**: Fair, Shift-Constrained and Peel-Off assignment strategies
//! - **`conflicts`**: Leave conflicts, rotation suggestions, same-shift overlaps
//! - **`session`**: Mutation surface wired to persistence and the audit log
//! - **`gateway`**: Persistence, absence and audit contracts
//! - **`validation`**: Input integrity checks (duplicate ids, unknown references)
//! - **`config`**: Keyword lists, score weights and defaults
//!
//! # Architecture
//!
//! Algorithms are pure functions over an explicit
//! [`WeeklyAssignmentStore`](store::WeeklyAssignmentStore); only
//! [`PlanningSession`](session::PlanningSession) talks to external systems.
//! Logging goes through `tracing`; no subscriber is installed.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

pub mod analysis;
pub mod config;
pub mod conflicts;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod models;
pub mod session;
pub mod store;
pub mod validation;
