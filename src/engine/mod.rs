//! Assignment engine.
//!
//! Fills unstaffed project groups for one ISO week with one of three
//! strategies that share a common sweep:
//!
//! | Strategy | Scorer | Shift policy | Second pass |
//! |----------|--------|--------------|-------------|
//! | [`Strategy::Fair`] | [`FairScore`] | [`LeastLoadedShift`] | yes |
//! | [`Strategy::ShiftConstrained`] | [`FairScore`] | [`ShiftPlan`] | yes |
//! | [`Strategy::PeelOff`] | [`PeelOffScore`] | [`LeastLoadedShift`] | no |
//!
//! All state lives in the [`WeeklyAssignmentStore`] passed to
//! [`AssignmentEngine::run`]; the engine never persists anything itself.
//!
//! # Usage
//!
//! ```no_run
//! use u_roster::analysis::KeywordClassifier;
//! use u_roster::config::PlannerConfig;
//! use u_roster::engine::{AssignmentEngine, AssignmentRequest, PlanningContext};
//! use u_roster::models::{Employee, WeekKey};
//! use u_roster::store::WeeklyAssignmentStore;
//!
//! let week = WeekKey::new(2026, 10).unwrap();
//! let employees = vec![Employee::new("E1"), Employee::new("E2")];
//! let config = PlannerConfig::default();
//! let classifier = KeywordClassifier::from_config(&config);
//! let ctx = PlanningContext::new(&employees, &[], &classifier, &config);
//!
//! let mut store = WeeklyAssignmentStore::new();
//! let summary = AssignmentEngine::run(&AssignmentRequest::fair(week), &ctx, &mut store);
//! println!("{} placements", summary.created.len());
//! ```

mod context;
mod fair;
mod peel_off;
mod scoring;
mod shift;
mod shift_plan;
mod sweep;
mod tie_break;

pub use context::PlanningContext;
pub use scoring::{
    adhesion_history, assignments_this_week, history_on_group, streak_on_group,
    CandidateScorer, FairScore, PeelOffScore,
};
pub use shift::{LeastLoadedShift, ShiftPolicy};
pub use shift_plan::ShiftPlan;
pub use sweep::is_relevant;
pub use tie_break::{EmployeeComparator, TieBreaker};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{AssignmentScope, GroupKey, ScheduleAssignment, Shift, WeekKey};
use crate::store::WeeklyAssignmentStore;

/// Assignment strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Balance load and rotate employees across groups.
    Fair,
    /// Operator-fixed shifts per group and per employee.
    ShiftConstrained(ShiftPlan),
    /// Staff adhesion tests from idle employees first.
    PeelOff,
}

impl Strategy {
    /// Strategy name for logs and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Fair => "fair",
            Strategy::ShiftConstrained(_) => "shift_constrained",
            Strategy::PeelOff => "peel_off",
        }
    }
}

/// Parameters of one engine run.
#[derive(Debug, Clone)]
pub struct AssignmentRequest {
    /// Target week.
    pub week: WeekKey,
    /// Strategy to apply.
    pub strategy: Strategy,
    /// Scope of the new assignments (peel-off forces adhesion-only).
    pub scope: AssignmentScope,
    /// Plant-wide shift system; `None` uses the configured one.
    pub shift_system: Option<u8>,
    /// Tie-breaking between equally scored candidates.
    pub tie_breaker: TieBreaker,
    /// Whether idle employees are placed after the primary sweep.
    pub second_pass: bool,
}

impl AssignmentRequest {
    fn with_strategy(week: WeekKey, strategy: Strategy) -> Self {
        Self {
            week,
            strategy,
            scope: AssignmentScope::WholeProject,
            shift_system: None,
            tie_breaker: TieBreaker::default(),
            second_pass: true,
        }
    }

    /// Fair rotation request.
    pub fn fair(week: WeekKey) -> Self {
        Self::with_strategy(week, Strategy::Fair)
    }

    /// Shift-constrained request.
    pub fn shift_constrained(week: WeekKey, plan: ShiftPlan) -> Self {
        Self::with_strategy(week, Strategy::ShiftConstrained(plan))
    }

    /// Peel-off request.
    pub fn peel_off(week: WeekKey) -> Self {
        Self::with_strategy(week, Strategy::PeelOff)
            .with_scope(AssignmentScope::AdhesionOnly)
    }

    /// Sets the scope.
    pub fn with_scope(mut self, scope: AssignmentScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the plant-wide shift system (clamped to 1..=3).
    pub fn with_shift_system(mut self, shift_system: u8) -> Self {
        self.shift_system = Some(shift_system.clamp(1, Shift::MAX));
        self
    }

    /// Sets the tie-breaker.
    pub fn with_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Enables or disables the second pass.
    pub fn with_second_pass(mut self, enabled: bool) -> Self {
        self.second_pass = enabled;
        self
    }
}

/// Result category of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The run placed this many assignments (possibly zero with unfilled groups).
    Assigned(usize),
    /// No unstaffed group or no eligible employee; nothing changed.
    NothingToAssign,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Target week.
    pub week: WeekKey,
    /// Strategy name.
    pub strategy: String,
    /// Newly created assignments, in placement order.
    pub created: Vec<ScheduleAssignment>,
    /// Candidate groups left unstaffed.
    pub unfilled: Vec<GroupKey>,
    /// Placements skipped because the key already existed.
    pub duplicates: usize,
}

impl RunSummary {
    /// Creates an empty summary.
    pub fn new(week: WeekKey, strategy: impl Into<String>) -> Self {
        Self {
            week,
            strategy: strategy.into(),
            created: Vec::new(),
            unfilled: Vec::new(),
            duplicates: 0,
        }
    }

    /// Outcome category.
    pub fn outcome(&self) -> RunOutcome {
        if self.created.is_empty() && self.unfilled.is_empty() && self.duplicates == 0 {
            RunOutcome::NothingToAssign
        } else {
            RunOutcome::Assigned(self.created.len())
        }
    }
}

/// Entry point for strategy runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentEngine;

impl AssignmentEngine {
    /// Runs `request` against the store, inserting new assignments.
    ///
    /// Never fails: ineligible inputs simply produce fewer placements.
    pub fn run(
        request: &AssignmentRequest,
        ctx: &PlanningContext<'_>,
        store: &mut WeeklyAssignmentStore,
    ) -> RunSummary {
        let mut summary = RunSummary::new(request.week, request.strategy.name());
        let ranks = request.tie_breaker.ranks(ctx.employees);
        let shift_system = request
            .shift_system
            .unwrap_or(ctx.config.shift_system)
            .clamp(1, Shift::MAX);

        info!(
            week = %request.week,
            strategy = request.strategy.name(),
            scope = %request.scope,
            shift_system,
            tie_breaker = ?request.tie_breaker,
            "assignment run started"
        );

        match &request.strategy {
            Strategy::Fair => {
                fair::run_fair(request, ctx, ranks, shift_system, store, &mut summary)
            }
            Strategy::ShiftConstrained(plan) => {
                fair::run_shift_constrained(request, ctx, ranks, plan, store, &mut summary)
            }
            Strategy::PeelOff => {
                peel_off::run_peel_off(request, ctx, ranks, shift_system, store, &mut summary)
            }
        }

        info!(
            week = %request.week,
            strategy = request.strategy.name(),
            created = summary.created.len(),
            unfilled = summary.unfilled.len(),
            duplicates = summary.duplicates,
            "assignment run finished"
        );
        summary
    }
}
