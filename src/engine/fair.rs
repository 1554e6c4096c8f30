//! Fair rotation and shift-constrained runs.
//!
//! Both score candidates with [`FairScore`]: load this week dominates,
//! then history on the group, then the current streak on it. They differ
//! only in how the shift is chosen.

use std::collections::HashMap;

use super::scoring::FairScore;
use super::shift::LeastLoadedShift;
use super::shift_plan::ShiftPlan;
use super::sweep::Sweep;
use super::{AssignmentRequest, PlanningContext, RunSummary};
use crate::store::WeeklyAssignmentStore;

/// Fair rotation with least-loaded shifts.
pub(crate) fn run_fair(
    request: &AssignmentRequest,
    ctx: &PlanningContext<'_>,
    ranks: HashMap<String, usize>,
    shift_system: u8,
    store: &mut WeeklyAssignmentStore,
    summary: &mut RunSummary,
) {
    let scorer = FairScore::from_config(ctx.config);
    let shifts = LeastLoadedShift::new(shift_system);
    let sweep = Sweep {
        ctx,
        week: request.week,
        scope: request.scope.clone(),
        scorer: &scorer,
        shifts: &shifts,
        ranks,
    };
    let groups = sweep.candidate_groups();
    sweep.execute(groups, request.second_pass, store, summary);
}

/// Fair scoring restricted to the operator's shift plan.
///
/// The second pass only reaches groups the idle employee's fixed shift is
/// allowed on, since the plan rejects every other pairing.
pub(crate) fn run_shift_constrained(
    request: &AssignmentRequest,
    ctx: &PlanningContext<'_>,
    ranks: HashMap<String, usize>,
    plan: &ShiftPlan,
    store: &mut WeeklyAssignmentStore,
    summary: &mut RunSummary,
) {
    let scorer = FairScore::from_config(ctx.config);
    let sweep = Sweep {
        ctx,
        week: request.week,
        scope: request.scope.clone(),
        scorer: &scorer,
        shifts: plan,
        ranks,
    };
    let groups = sweep.candidate_groups();
    sweep.execute(groups, request.second_pass, store, summary);
}
