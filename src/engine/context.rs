//! Planning context for engine runs.

use crate::analysis::TestClassifier;
use crate::config::PlannerConfig;
use crate::gateway::{AbsenceLookup, NoAbsences};
use crate::models::{Employee, GroupKey, ProjectGroup};

static NO_ABSENCES: NoAbsences = NoAbsences;

/// Read-only inputs shared by every strategy.
///
/// The mutable assignment set is passed separately as a
/// [`WeeklyAssignmentStore`](crate::store::WeeklyAssignmentStore).
#[derive(Clone, Copy)]
pub struct PlanningContext<'a> {
    /// Employee pool.
    pub employees: &'a [Employee],
    /// Project groups to staff.
    pub groups: &'a [ProjectGroup],
    /// Absence calendar.
    pub absence: &'a dyn AbsenceLookup,
    /// Audit / adhesion test classification.
    pub classifier: &'a dyn TestClassifier,
    /// Engine configuration.
    pub config: &'a PlannerConfig,
}

impl<'a> PlanningContext<'a> {
    /// Creates a context with no absences.
    pub fn new(
        employees: &'a [Employee],
        groups: &'a [ProjectGroup],
        classifier: &'a dyn TestClassifier,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            employees,
            groups,
            absence: &NO_ABSENCES,
            classifier,
            config,
        }
    }

    /// Sets the absence calendar.
    pub fn with_absence(mut self, absence: &'a dyn AbsenceLookup) -> Self {
        self.absence = absence;
        self
    }

    /// Looks up an employee by id.
    pub fn employee(&self, id: &str) -> Option<&'a Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Looks up a group by key.
    pub fn group(&self, key: &GroupKey) -> Option<&'a ProjectGroup> {
        self.groups.iter().find(|g| g.key == *key)
    }
}

impl std::fmt::Debug for PlanningContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanningContext")
            .field("employees", &self.employees.len())
            .field("groups", &self.groups.len())
            .field("classifier", &self.classifier)
            .finish()
    }
}
