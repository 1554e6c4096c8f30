//! Peel-off (adhesion) pool.
//!
//! Adhesion tests are staffed as their own priority pool: only groups with
//! a required adhesion test are considered, every placement is
//! adhesion-only, and employees without any assignment this week are
//! drawn first. Then the least adhesion history wins, and only then the
//! lighter load this week. There is no second pass.

use std::collections::HashMap;

use super::scoring::PeelOffScore;
use super::shift::LeastLoadedShift;
use super::sweep::Sweep;
use super::{AssignmentRequest, PlanningContext, RunSummary};
use crate::models::AssignmentScope;
use crate::store::WeeklyAssignmentStore;

/// Staffs adhesion groups, ignoring the request's scope and second pass.
pub(crate) fn run_peel_off(
    request: &AssignmentRequest,
    ctx: &PlanningContext<'_>,
    ranks: HashMap<String, usize>,
    shift_system: u8,
    store: &mut WeeklyAssignmentStore,
    summary: &mut RunSummary,
) {
    let scorer = PeelOffScore::new();
    let shifts = LeastLoadedShift::new(shift_system);
    let sweep = Sweep {
        ctx,
        week: request.week,
        scope: AssignmentScope::AdhesionOnly,
        scorer: &scorer,
        shifts: &shifts,
        ranks,
    };
    let groups = sweep.candidate_groups();
    sweep.execute(groups, false, store, summary);
}
