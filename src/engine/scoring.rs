//! Candidate scoring rules.
//!
//! # Score Convention
//! **Lower score = better candidate**, as with dispatching rules.
//! Ties are broken by [`TieBreaker`](super::TieBreaker) rank.
//!
//! # History
//! History is read from the store: every loaded week strictly before the
//! target week counts, so callers load as many past weeks as they want
//! the engine to remember.

use std::fmt::Debug;

use crate::config::{PlannerConfig, ScoreWeights};
use crate::models::{AssignmentScope, Employee, GroupKey, WeekKey};
use crate::store::WeeklyAssignmentStore;

/// A rule that scores an employee as candidate for a group.
pub trait CandidateScorer: Send + Sync + Debug {
    /// Rule name for logs.
    fn name(&self) -> &'static str;

    /// Score of `employee` for `group` in `week`; lower wins.
    fn score(
        &self,
        employee: &Employee,
        group: &GroupKey,
        week: &WeekKey,
        store: &WeeklyAssignmentStore,
    ) -> f64;
}

/// Assignments the employee holds in `week`.
pub fn assignments_this_week(
    store: &WeeklyAssignmentStore,
    week: &WeekKey,
    employee_id: &str,
) -> usize {
    store
        .week(week)
        .iter()
        .filter(|a| a.employee_id == employee_id)
        .count()
}

/// Assignments the employee held on `group` before `week`.
pub fn history_on_group(
    store: &WeeklyAssignmentStore,
    week: &WeekKey,
    employee_id: &str,
    group: &GroupKey,
) -> usize {
    store
        .iter()
        .filter(|a| a.week < *week && a.employee_id == employee_id && a.group_key == *group)
        .count()
}

/// Consecutive weeks immediately before `week` in which the employee was
/// on `group`, looking back at most `lookback` weeks.
pub fn streak_on_group(
    store: &WeeklyAssignmentStore,
    week: &WeekKey,
    employee_id: &str,
    group: &GroupKey,
    lookback: u32,
) -> usize {
    week.preceding(lookback)
        .take_while(|w| store.has_pairing(w, employee_id, group))
        .count()
}

/// Adhesion-only assignments the employee held before `week`, on any group.
pub fn adhesion_history(
    store: &WeeklyAssignmentStore,
    week: &WeekKey,
    employee_id: &str,
) -> usize {
    store
        .iter()
        .filter(|a| {
            a.week < *week
                && a.employee_id == employee_id
                && a.scope == AssignmentScope::AdhesionOnly
        })
        .count()
}

/// Fair rotation score.
///
/// `this_week × load + history × prior_on_group + streak × consecutive_weeks`
#[derive(Debug, Clone, PartialEq)]
pub struct FairScore {
    pub weights: ScoreWeights,
    pub lookback: u32,
}

impl FairScore {
    /// Builds the rule from configuration.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            weights: config.weights.clone(),
            lookback: config.streak_lookback,
        }
    }
}

impl CandidateScorer for FairScore {
    fn name(&self) -> &'static str {
        "FAIR"
    }

    fn score(
        &self,
        employee: &Employee,
        group: &GroupKey,
        week: &WeekKey,
        store: &WeeklyAssignmentStore,
    ) -> f64 {
        let load = assignments_this_week(store, week, &employee.id) as f64;
        let history = history_on_group(store, week, &employee.id, group) as f64;
        let streak = streak_on_group(store, week, &employee.id, group, self.lookback) as f64;
        self.weights.this_week * load
            + self.weights.history * history
            + self.weights.streak * streak
    }
}

/// Peel-off pool score.
///
/// Ranks strictly: idle employees before anyone already placed this week,
/// then least adhesion history, then fewest assignments this week.
///
/// The three keys are packed into one score in base `store.len() + 1`.
/// Neither the history nor the weekly load can reach that base, so a
/// higher key always outweighs any difference in the lower ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeelOffScore;

impl PeelOffScore {
    /// Creates the rule.
    pub fn new() -> Self {
        Self
    }
}

impl CandidateScorer for PeelOffScore {
    fn name(&self) -> &'static str {
        "PEEL_OFF"
    }

    fn score(
        &self,
        employee: &Employee,
        _group: &GroupKey,
        week: &WeekKey,
        store: &WeeklyAssignmentStore,
    ) -> f64 {
        let base = (store.len() + 1) as f64;
        let load = assignments_this_week(store, week, &employee.id) as f64;
        let busy = if load > 0.0 { 1.0 } else { 0.0 };
        let history = adhesion_history(store, week, &employee.id) as f64;
        (busy * base + history) * base + load
    }
}
