//! Shared placement scaffold.
//!
//! # Algorithm
//! 1. **Primary sweep**: for each candidate group (in input order) with no
//!    assignment of the requested scope this week, score every eligible
//!    employee and place the lowest `(score, rank)` on the shift chosen by
//!    the shift policy. Groups without a candidate are reported unfilled.
//! 2. **Second pass** (optional): every eligible employee still without an
//!    assignment this week, in rank order, is placed on the candidate group
//!    with the highest minutes per assigned person, recomputed after each
//!    placement.
//!
//! # Complexity
//! O(g × e × h) where g=groups, e=employees, h=store size (history scans).

use std::collections::HashMap;

use tracing::{debug, info};

use super::scoring::CandidateScorer;
use super::shift::ShiftPolicy;
use super::{PlanningContext, RunSummary};
use crate::analysis::{group_minutes_per_person, TestClassifier};
use crate::models::{AssignmentScope, Employee, ProjectGroup, ScheduleAssignment, Shift, WeekKey};
use crate::store::{InsertOutcome, WeeklyAssignmentStore};

/// Whether `group` has work for `scope` in `week`.
pub fn is_relevant(
    group: &ProjectGroup,
    week: &WeekKey,
    scope: &AssignmentScope,
    classifier: &dyn TestClassifier,
) -> bool {
    if !group.has_demand(week) {
        return false;
    }
    match scope {
        AssignmentScope::WholeProject => true,
        AssignmentScope::AuditOnly => group
            .required_tests(week)
            .iter()
            .any(|t| classifier.is_audit(&t.test_name)),
        AssignmentScope::AdhesionOnly => group
            .required_tests(week)
            .iter()
            .any(|t| classifier.is_adhesion(&t.test_name)),
        AssignmentScope::SpecificTest(test_id) => group
            .required_tests(week)
            .iter()
            .any(|t| t.test_id == *test_id),
        AssignmentScope::SpecificPart(part_id) => group.requires_part(week, part_id),
    }
}

/// One strategy run's placement machinery.
pub(crate) struct Sweep<'r, 'a> {
    pub ctx: &'r PlanningContext<'a>,
    pub week: WeekKey,
    pub scope: AssignmentScope,
    pub scorer: &'r dyn CandidateScorer,
    pub shifts: &'r dyn ShiftPolicy,
    pub ranks: HashMap<String, usize>,
}

impl<'r, 'a> Sweep<'r, 'a> {
    /// Groups with work for the run's scope, in input order.
    pub fn candidate_groups(&self) -> Vec<&'a ProjectGroup> {
        self.ctx
            .groups
            .iter()
            .filter(|g| is_relevant(g, &self.week, &self.scope, self.ctx.classifier))
            .collect()
    }

    /// Whether the group has no assignment of the run's scope.
    pub fn is_unstaffed(&self, group: &ProjectGroup, store: &WeeklyAssignmentStore) -> bool {
        !store
            .week(&self.week)
            .iter()
            .any(|a| a.group_key == group.key && a.scope == self.scope)
    }

    /// Available and not absent this week.
    pub fn is_eligible(&self, employee: &Employee) -> bool {
        employee.is_available() && !self.ctx.absence.is_absent(&employee.id, &self.week)
    }

    /// Whether any employee passes the base eligibility filter.
    pub fn has_eligible(&self) -> bool {
        self.ctx.employees.iter().any(|e| self.is_eligible(e))
    }

    fn holds_scope(
        &self,
        employee: &Employee,
        group: &ProjectGroup,
        store: &WeeklyAssignmentStore,
    ) -> bool {
        store
            .week(&self.week)
            .iter()
            .any(|a| a.is_on(&employee.id, &group.key, &self.week) && a.scope == self.scope)
    }

    fn rank(&self, employee: &Employee) -> usize {
        self.ranks.get(&employee.id).copied().unwrap_or(usize::MAX)
    }

    fn best_candidate(
        &self,
        group: &ProjectGroup,
        store: &WeeklyAssignmentStore,
    ) -> Option<(&'a Employee, Shift)> {
        self.ctx
            .employees
            .iter()
            .filter(|e| self.is_eligible(e) && !self.holds_scope(e, group, store))
            .filter_map(|e| {
                self.shifts
                    .shift_for(e, group, &self.week, store)
                    .map(|shift| (e, shift))
            })
            .map(|(e, shift)| {
                let score = self.scorer.score(e, &group.key, &self.week, store);
                debug!(
                    rule = self.scorer.name(),
                    group = %group.key,
                    employee = %e.id,
                    score,
                    "candidate scored"
                );
                (e, shift, score)
            })
            .min_by(|a, b| {
                a.2.total_cmp(&b.2)
                    .then_with(|| self.rank(a.0).cmp(&self.rank(b.0)))
            })
            .map(|(e, shift, _)| (e, shift))
    }

    fn commit(
        &self,
        employee: &Employee,
        group: &ProjectGroup,
        shift: Shift,
        store: &mut WeeklyAssignmentStore,
        summary: &mut RunSummary,
    ) {
        let assignment = ScheduleAssignment::new(
            employee.id.clone(),
            group.key.clone(),
            self.week,
            shift,
            self.scope.clone(),
        );
        match store.insert(assignment.clone()) {
            InsertOutcome::Created(_) => {
                debug!(
                    employee = %employee.id,
                    group = %group.key,
                    shift = shift.index(),
                    scope = %self.scope,
                    "placed"
                );
                summary.created.push(assignment);
            }
            InsertOutcome::Duplicate { existing_id } => {
                debug!(%existing_id, "duplicate placement skipped");
                summary.duplicates += 1;
            }
        }
    }

    /// Runs the primary sweep over `groups`, then the second pass if asked.
    ///
    /// Returns without touching the store when no group is unstaffed or no
    /// employee is eligible.
    pub fn execute(
        &self,
        groups: Vec<&'a ProjectGroup>,
        second_pass: bool,
        store: &mut WeeklyAssignmentStore,
        summary: &mut RunSummary,
    ) {
        let unstaffed = groups.iter().filter(|g| self.is_unstaffed(g, store)).count();
        if unstaffed == 0 || !self.has_eligible() {
            info!(
                week = %self.week,
                scope = %self.scope,
                candidate_groups = groups.len(),
                unstaffed,
                "nothing to assign"
            );
            return;
        }

        self.primary(&groups, store, summary);
        if second_pass {
            self.second_pass(&groups, store, summary);
        }
    }

    /// Places one employee on every unstaffed candidate group.
    pub fn primary(
        &self,
        groups: &[&ProjectGroup],
        store: &mut WeeklyAssignmentStore,
        summary: &mut RunSummary,
    ) {
        for group in groups {
            if !self.is_unstaffed(group, store) {
                continue;
            }
            match self.best_candidate(group, store) {
                Some((employee, shift)) => self.commit(employee, group, shift, store, summary),
                None => {
                    debug!(group = %group.key, "no eligible candidate");
                    summary.unfilled.push(group.key.clone());
                }
            }
        }
    }

    /// Places every idle eligible employee on the most loaded group.
    pub fn second_pass(
        &self,
        groups: &[&ProjectGroup],
        store: &mut WeeklyAssignmentStore,
        summary: &mut RunSummary,
    ) {
        if groups.is_empty() {
            return;
        }

        let mut idle: Vec<&Employee> = self
            .ctx
            .employees
            .iter()
            .filter(|e| self.is_eligible(e) && store.for_employee(&self.week, &e.id).is_empty())
            .collect();
        idle.sort_by_key(|e| self.rank(e));

        for employee in idle {
            let current: &WeeklyAssignmentStore = store;
            let target = groups
                .iter()
                .enumerate()
                .filter(|(_, g)| !self.holds_scope(employee, g, current))
                .filter_map(|(i, g)| {
                    self.shifts
                        .shift_for(employee, g, &self.week, current)
                        .map(|shift| (i, *g, shift))
                })
                .map(|(i, g, shift)| {
                    let per_person =
                        group_minutes_per_person(&self.week, g, current.week(&self.week));
                    (i, g, shift, per_person)
                })
                .max_by(|a, b| a.3.total_cmp(&b.3).then_with(|| b.0.cmp(&a.0)));

            match target {
                Some((_, group, shift, per_person)) => {
                    debug!(
                        employee = %employee.id,
                        group = %group.key,
                        per_person,
                        "second pass placement"
                    );
                    self.commit(employee, group, shift, store, summary);
                }
                None => debug!(employee = %employee.id, "no group for idle employee"),
            }
        }
    }
}
