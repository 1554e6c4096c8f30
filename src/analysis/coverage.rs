//! Coverage analyzer.
//!
//! Classifies a project group's staffing in a week as Full, Partial or None.
//!
//! # Precedence
//! 1. Any whole-project assignment ⇒ Full.
//! 2. No required tests this week ⇒ Full if anyone is assigned, else None.
//! 3. Otherwise the union of tests covered by scoped assignments is
//!    compared with the required set: superset ⇒ Full, anything assigned
//!    ⇒ Partial, nothing assigned ⇒ None.
//!
//! Audit-only and adhesion-only scopes cover every required test the
//! [`TestClassifier`] puts in that category.

use std::collections::HashSet;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::models::{AssignmentScope, GroupKey, ProjectGroup, ScheduleAssignment, WeekKey};

/// Staffing level of a group in a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverageLevel {
    Full,
    Partial,
    None,
}

/// Derived coverage of one group in one week. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageStatus {
    /// Staffing level.
    pub level: CoverageLevel,
    /// Names of uncovered tests (at most the configured limit).
    pub missing_tests: Vec<String>,
    /// Human-readable summary.
    pub tooltip: String,
}

impl CoverageStatus {
    fn full(tooltip: impl Into<String>) -> Self {
        Self {
            level: CoverageLevel::Full,
            missing_tests: Vec::new(),
            tooltip: tooltip.into(),
        }
    }

    fn none() -> Self {
        Self {
            level: CoverageLevel::None,
            missing_tests: Vec::new(),
            tooltip: "Not staffed".to_string(),
        }
    }

    /// Whether the group is fully covered.
    pub fn is_full(&self) -> bool {
        self.level == CoverageLevel::Full
    }
}

/// Decides which test names belong to the audit and adhesion categories.
pub trait TestClassifier: Send + Sync + Debug {
    /// Whether the test is an audit.
    fn is_audit(&self, test_name: &str) -> bool;

    /// Whether the test is a peel-off / adhesion test.
    fn is_adhesion(&self, test_name: &str) -> bool;
}

/// Case-insensitive substring matcher over configurable keyword lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordClassifier {
    audit: Vec<String>,
    adhesion: Vec<String>,
}

impl KeywordClassifier {
    /// Creates a classifier from keyword lists.
    pub fn new<I, J, S, T>(audit: I, adhesion: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            audit: audit.into_iter().map(|k| k.as_ref().to_lowercase()).collect(),
            adhesion: adhesion
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Builds the classifier from the configured keyword lists.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(&config.audit_keywords, &config.adhesion_keywords)
    }

    fn matches(keywords: &[String], test_name: &str) -> bool {
        let name = test_name.to_lowercase();
        keywords.iter().any(|k| !k.is_empty() && name.contains(k.as_str()))
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl TestClassifier for KeywordClassifier {
    fn is_audit(&self, test_name: &str) -> bool {
        Self::matches(&self.audit, test_name)
    }

    fn is_adhesion(&self, test_name: &str) -> bool {
        Self::matches(&self.adhesion, test_name)
    }
}

/// Default number of missing test names listed.
pub const DEFAULT_MAX_MISSING: usize = 3;

/// Computes the coverage of `group` in `week`.
///
/// `assignments` may contain other groups and weeks; they are ignored.
pub fn staffing_status(
    group: &ProjectGroup,
    week: &WeekKey,
    assignments: &[ScheduleAssignment],
    classifier: &dyn TestClassifier,
) -> CoverageStatus {
    staffing_status_with_limit(group, week, assignments, classifier, DEFAULT_MAX_MISSING)
}

/// [`staffing_status`] with an explicit limit on listed missing tests.
pub fn staffing_status_with_limit(
    group: &ProjectGroup,
    week: &WeekKey,
    assignments: &[ScheduleAssignment],
    classifier: &dyn TestClassifier,
    max_missing: usize,
) -> CoverageStatus {
    let relevant: Vec<&ScheduleAssignment> = assignments
        .iter()
        .filter(|a| a.week == *week && a.group_key == group.key)
        .collect();

    if relevant
        .iter()
        .any(|a| a.scope == AssignmentScope::WholeProject)
    {
        return CoverageStatus::full("Whole project covered");
    }

    let required = group.required_tests(week);
    if required.is_empty() {
        return if relevant.is_empty() {
            CoverageStatus::none()
        } else {
            CoverageStatus::full("No tests required this week")
        };
    }

    let mut covered: HashSet<&str> = HashSet::new();
    for a in &relevant {
        match &a.scope {
            AssignmentScope::SpecificTest(test_id) => {
                covered.insert(test_id.as_str());
            }
            AssignmentScope::AuditOnly => covered.extend(
                required
                    .iter()
                    .filter(|t| classifier.is_audit(&t.test_name))
                    .map(|t| t.test_id.as_str()),
            ),
            AssignmentScope::AdhesionOnly => covered.extend(
                required
                    .iter()
                    .filter(|t| classifier.is_adhesion(&t.test_name))
                    .map(|t| t.test_id.as_str()),
            ),
            AssignmentScope::WholeProject | AssignmentScope::SpecificPart(_) => {}
        }
    }

    let missing: Vec<&str> = required
        .iter()
        .filter(|t| !covered.contains(t.test_id.as_str()))
        .map(|t| t.test_name.as_str())
        .collect();

    if missing.is_empty() {
        return CoverageStatus::full(format!("All {} tests covered", required.len()));
    }
    if relevant.is_empty() {
        return CoverageStatus::none();
    }

    let listed: Vec<String> = missing
        .iter()
        .take(max_missing)
        .map(|s| s.to_string())
        .collect();
    let mut tooltip = format!("Missing: {}", listed.join(", "));
    if missing.len() > listed.len() {
        tooltip.push_str(&format!(" (+{} more)", missing.len() - listed.len()));
    }

    CoverageStatus {
        level: CoverageLevel::Partial,
        missing_tests: listed,
        tooltip,
    }
}

/// Coverage of every group with demand in `week`, in group order.
pub fn week_coverage(
    week: &WeekKey,
    groups: &[ProjectGroup],
    assignments: &[ScheduleAssignment],
    classifier: &dyn TestClassifier,
) -> Vec<(GroupKey, CoverageStatus)> {
    groups
        .iter()
        .filter(|g| g.has_demand(week))
        .map(|g| {
            (
                g.key.clone(),
                staffing_status(g, week, assignments, classifier),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Shift, TestProject, WeeklyDemand};

    fn w10() -> WeekKey {
        WeekKey::new(2026, 10).unwrap()
    }

    fn group_with(tests: &[(&str, &str)]) -> ProjectGroup {
        let mut g = ProjectGroup::new(GroupKey::new("CustomerX", "TypeY"));
        for (i, (id, name)) in tests.iter().enumerate() {
            g = g.with_project(
                TestProject::new(format!("P{i}"), "CustomerX", "TypeY", *id)
                    .with_test_name(*name)
                    .with_demand(w10(), WeeklyDemand::new(2, 10.0)),
            );
        }
        g
    }

    fn assign(employee: &str, scope: AssignmentScope) -> ScheduleAssignment {
        ScheduleAssignment::new(
            employee,
            GroupKey::new("CustomerX", "TypeY"),
            w10(),
            Shift::FIRST,
            scope,
        )
    }

    #[test]
    fn test_whole_project_is_full() {
        let g = group_with(&[("A", "Tensile"), ("B", "Salt spray")]);
        let a = vec![assign("E1", AssignmentScope::WholeProject)];
        let s = staffing_status(&g, &w10(), &a, &KeywordClassifier::default());
        assert_eq!(s.level, CoverageLevel::Full);
    }

    #[test]
    fn test_specific_tests_union_is_full() {
        let g = group_with(&[("A", "Tensile"), ("B", "Salt spray")]);
        let a = vec![
            assign("E1", AssignmentScope::SpecificTest("A".into())),
            assign("E2", AssignmentScope::SpecificTest("B".into())),
        ];
        let s = staffing_status(&g, &w10(), &a, &KeywordClassifier::default());
        assert_eq!(s.level, CoverageLevel::Full);
        assert!(s.missing_tests.is_empty());
    }

    #[test]
    fn test_single_specific_test_is_partial() {
        let g = group_with(&[("A", "A"), ("B", "B")]);
        let a = vec![assign("E1", AssignmentScope::SpecificTest("A".into()))];
        let s = staffing_status(&g, &w10(), &a, &KeywordClassifier::default());
        assert_eq!(s.level, CoverageLevel::Partial);
        assert_eq!(s.missing_tests, vec!["B"]);
        assert_eq!(s.tooltip, "Missing: B");
    }

    #[test]
    fn test_no_assignments_is_none() {
        let g = group_with(&[("A", "Tensile")]);
        let s = staffing_status(&g, &w10(), &[], &KeywordClassifier::default());
        assert_eq!(s.level, CoverageLevel::None);
    }

    #[test]
    fn test_no_required_tests() {
        let g = ProjectGroup::new(GroupKey::new("CustomerX", "TypeY"));
        let classifier = KeywordClassifier::default();
        assert_eq!(
            staffing_status(&g, &w10(), &[], &classifier).level,
            CoverageLevel::None
        );
        let a = vec![assign("E1", AssignmentScope::AuditOnly)];
        assert_eq!(
            staffing_status(&g, &w10(), &a, &classifier).level,
            CoverageLevel::Full
        );
    }

    #[test]
    fn test_audit_and_adhesion_scopes() {
        let g = group_with(&[
            ("A1", "Process AUDIT"),
            ("P1", "Peel strength"),
            ("X1", "Gloss"),
        ]);
        let classifier = KeywordClassifier::default();

        let a = vec![
            assign("E1", AssignmentScope::AuditOnly),
            assign("E2", AssignmentScope::AdhesionOnly),
        ];
        let s = staffing_status(&g, &w10(), &a, &classifier);
        assert_eq!(s.level, CoverageLevel::Partial);
        assert_eq!(s.missing_tests, vec!["Gloss"]);

        let mut all = a.clone();
        all.push(assign("E3", AssignmentScope::SpecificTest("X1".into())));
        assert!(staffing_status(&g, &w10(), &all, &classifier).is_full());
    }

    #[test]
    fn test_uncovering_assignment_is_partial() {
        let g = group_with(&[("A", "Tensile")]);
        let a = vec![assign("E1", AssignmentScope::SpecificPart("door".into()))];
        let s = staffing_status(&g, &w10(), &a, &KeywordClassifier::default());
        assert_eq!(s.level, CoverageLevel::Partial);
        assert_eq!(s.missing_tests, vec!["Tensile"]);
    }

    #[test]
    fn test_missing_list_truncated() {
        let g = group_with(&[("A", "A"), ("B", "B"), ("C", "C"), ("D", "D"), ("E", "E")]);
        let a = vec![assign("E1", AssignmentScope::AuditOnly)];
        let s = staffing_status(&g, &w10(), &a, &KeywordClassifier::default());
        assert_eq!(s.level, CoverageLevel::Partial);
        assert_eq!(s.missing_tests, vec!["A", "B", "C"]);
        assert_eq!(s.tooltip, "Missing: A, B, C (+2 more)");
    }

    #[test]
    fn test_custom_keywords() {
        let classifier = KeywordClassifier::new(["inspection"], ["bond"]);
        assert!(classifier.is_audit("Final Inspection"));
        assert!(!classifier.is_audit("Audit"));
        assert!(classifier.is_adhesion("BOND test"));
        assert!(!classifier.is_adhesion("Peel"));
    }

    #[test]
    fn test_default_keywords() {
        let c = KeywordClassifier::default();
        assert!(c.is_audit("Audyt wyrobu"));
        assert!(c.is_adhesion("Test przyczepności"));
        assert!(c.is_adhesion("Adhesion cross-cut"));
        assert!(!c.is_adhesion("Gloss"));
    }

    #[test]
    fn test_week_coverage_skips_idle_groups() {
        let busy = group_with(&[("A", "A")]);
        let idle = ProjectGroup::new(GroupKey::new("Idle", "T"));
        let a = vec![assign("E1", AssignmentScope::WholeProject)];
        let result = week_coverage(&w10(), &[busy, idle], &a, &KeywordClassifier::default());
        assert_eq!(result.len(), 1);
        assert!(result[0].1.is_full());
    }
}
