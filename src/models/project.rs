//! Test project and project group models.
//!
//! A [`TestProject`] is one QC test run for a customer, carrying its
//! required/completed quantities per week. Projects are bundled into a
//! [`ProjectGroup`], the unit employees are staffed onto.
//!
//! # Minutes
//! A group's workload for a week is `Σ required × minutes_per_unit` over its
//! projects. Projects without `minutes_per_unit` contribute zero.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::WeekKey;

/// Required vs. completed quantity for one project in one week.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyDemand {
    /// Target quantity (SOLL).
    pub required: u32,
    /// Completed quantity (IST).
    pub completed: u32,
    /// Minutes per tested unit. `None` = not estimated.
    pub minutes_per_unit: Option<f64>,
}

impl WeeklyDemand {
    /// Creates a demand with a minutes estimate.
    pub fn new(required: u32, minutes_per_unit: f64) -> Self {
        Self {
            required,
            completed: 0,
            minutes_per_unit: Some(minutes_per_unit),
        }
    }

    /// Creates a demand without a minutes estimate.
    pub fn unestimated(required: u32) -> Self {
        Self {
            required,
            completed: 0,
            minutes_per_unit: None,
        }
    }

    /// Sets the completed quantity.
    pub fn with_completed(mut self, completed: u32) -> Self {
        self.completed = completed;
        self
    }

    /// Planned minutes (`required × minutes_per_unit`, zero if unestimated).
    pub fn minutes(&self) -> f64 {
        self.minutes_per_unit
            .map(|m| self.required as f64 * m)
            .unwrap_or(0.0)
    }

    /// Units still outstanding.
    pub fn remaining(&self) -> u32 {
        self.required.saturating_sub(self.completed)
    }
}

/// A single QC test project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestProject {
    /// Unique project identifier.
    pub id: String,
    /// Customer name.
    pub customer: String,
    /// Product / project type.
    pub test_type: String,
    /// Test identifier (used for scoped coverage).
    pub test_id: String,
    /// Human-readable test name (used by keyword classification).
    pub test_name: String,
    /// Optional part this project tests.
    pub part_id: Option<String>,
    /// Demand per week.
    pub demand: BTreeMap<WeekKey, WeeklyDemand>,
}

impl TestProject {
    /// Creates a project. The test id doubles as the test name until set.
    pub fn new(
        id: impl Into<String>,
        customer: impl Into<String>,
        test_type: impl Into<String>,
        test_id: impl Into<String>,
    ) -> Self {
        let test_id = test_id.into();
        Self {
            id: id.into(),
            customer: customer.into(),
            test_type: test_type.into(),
            test_name: test_id.clone(),
            test_id,
            part_id: None,
            demand: BTreeMap::new(),
        }
    }

    /// Sets the test name.
    pub fn with_test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = name.into();
        self
    }

    /// Sets the tested part.
    pub fn with_part(mut self, part_id: impl Into<String>) -> Self {
        self.part_id = Some(part_id.into());
        self
    }

    /// Sets the demand for a week.
    pub fn with_demand(mut self, week: WeekKey, demand: WeeklyDemand) -> Self {
        self.demand.insert(week, demand);
        self
    }

    /// Demand for a week, if any.
    pub fn demand_in(&self, week: &WeekKey) -> Option<&WeeklyDemand> {
        self.demand.get(week)
    }

    /// Whether the project requires any units in `week`.
    pub fn is_required_in(&self, week: &WeekKey) -> bool {
        self.demand_in(week).is_some_and(|d| d.required > 0)
    }
}

/// Composite key of a project group: customer × type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    /// Customer name.
    pub customer: String,
    /// Project type (empty when grouped by customer only).
    pub test_type: String,
}

impl GroupKey {
    /// Creates a group key.
    pub fn new(customer: impl Into<String>, test_type: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            test_type: test_type.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.test_type.is_empty() {
            write!(f, "{}", self.customer)
        } else {
            write!(f, "{}-{}", self.customer, self.test_type)
        }
    }
}

/// A test required by a group in a given week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredTest {
    /// Test identifier.
    pub test_id: String,
    /// Test name.
    pub test_name: String,
}

/// How test projects are bundled into project groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupingMode {
    /// One group per (customer, type).
    #[default]
    CustomerAndType,
    /// One group per customer.
    Customer,
}

/// A staffing unit: one or more test projects sharing a group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectGroup {
    /// Group key.
    pub key: GroupKey,
    /// Constituent test projects.
    pub projects: Vec<TestProject>,
}

impl ProjectGroup {
    /// Creates an empty group.
    pub fn new(key: GroupKey) -> Self {
        Self {
            key,
            projects: Vec::new(),
        }
    }

    /// Adds a project.
    pub fn with_project(mut self, project: TestProject) -> Self {
        self.projects.push(project);
        self
    }

    /// Total planned minutes for `week`.
    pub fn total_minutes(&self, week: &WeekKey) -> f64 {
        self.projects
            .iter()
            .filter_map(|p| p.demand_in(week))
            .map(WeeklyDemand::minutes)
            .sum()
    }

    /// Units still outstanding in `week`.
    pub fn remaining(&self, week: &WeekKey) -> u32 {
        self.projects
            .iter()
            .filter_map(|p| p.demand_in(week))
            .map(WeeklyDemand::remaining)
            .sum()
    }

    /// Whether any project requires units in `week`.
    pub fn has_demand(&self, week: &WeekKey) -> bool {
        self.projects.iter().any(|p| p.is_required_in(week))
    }

    /// Unique tests with nonzero requirement in `week`, in project order.
    pub fn required_tests(&self, week: &WeekKey) -> Vec<RequiredTest> {
        let mut seen = HashSet::new();
        self.projects
            .iter()
            .filter(|p| p.is_required_in(week))
            .filter(|p| seen.insert(p.test_id.as_str()))
            .map(|p| RequiredTest {
                test_id: p.test_id.clone(),
                test_name: p.test_name.clone(),
            })
            .collect()
    }

    /// Whether a project testing `part_id` has demand in `week`.
    pub fn requires_part(&self, week: &WeekKey, part_id: &str) -> bool {
        self.projects
            .iter()
            .any(|p| p.part_id.as_deref() == Some(part_id) && p.is_required_in(week))
    }

    /// Number of projects.
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

/// Bundles projects into groups, preserving first-seen order.
pub fn group_projects(projects: Vec<TestProject>, mode: GroupingMode) -> Vec<ProjectGroup> {
    let mut groups: Vec<ProjectGroup> = Vec::new();
    for project in projects {
        let key = match mode {
            GroupingMode::CustomerAndType => {
                GroupKey::new(project.customer.clone(), project.test_type.clone())
            }
            GroupingMode::Customer => GroupKey::new(project.customer.clone(), ""),
        };
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.projects.push(project),
            None => groups.push(ProjectGroup::new(key).with_project(project)),
        }
    }
    groups
}
