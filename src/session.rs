//! Planning session: the mutation surface for one planning workspace.
//!
//! A [`PlanningSession`] owns the [`WeeklyAssignmentStore`] and wires it to
//! the outside world. Every create / move / remove goes through the store's
//! duplicate guard first, then is written through the
//! [`PersistenceGateway`] and reported to the [`AuditSink`].
//!
//! # Failure Model
//! Persistence writes are issued after the in-memory mutation. A failed
//! write is returned as [`PlannerError::Gateway`] and the in-memory state is
//! **not** rolled back: the caller either retries or reloads the week with
//! [`PlanningSession::load_week`].

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};

use crate::analysis::{
    compute_workload, staffing_status_with_limit, CoverageStatus, EmployeeLoad,
    KeywordClassifier, TestClassifier, WeekKpi,
};
use crate::config::PlannerConfig;
use crate::conflicts::{self, ConflictReport, LeaveConflict};
use crate::engine::{AssignmentEngine, AssignmentRequest, PlanningContext, RunSummary};
use crate::error::{PlannerError, PlannerResult};
use crate::gateway::{
    AbsenceLookup, AuditAction, AuditEvent, AuditSink, NoAbsences, NullAuditSink,
    PersistenceGateway,
};
use crate::models::{
    AssignmentCommand, Employee, GroupKey, ProjectGroup, ScheduleAssignment, Shift, WeekKey,
};
use crate::store::{InsertOutcome, MoveOutcome, WeeklyAssignmentStore};

static NO_ABSENCES: NoAbsences = NoAbsences;
static NULL_AUDIT: NullAuditSink = NullAuditSink;

/// Result of a manual placement.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    /// New assignment stored and persisted.
    Created(ScheduleAssignment),
    /// Same key already held; nothing changed.
    Duplicate { existing_id: String },
}

/// Planning workspace over a set of employees and groups.
pub struct PlanningSession<'a> {
    store: WeeklyAssignmentStore,
    gateway: &'a dyn PersistenceGateway,
    audit: &'a dyn AuditSink,
    absence: &'a dyn AbsenceLookup,
    classifier: Box<dyn TestClassifier>,
    employees: &'a [Employee],
    groups: &'a [ProjectGroup],
    config: PlannerConfig,
}

impl<'a> PlanningSession<'a> {
    /// Creates a session with an empty store, no absences and no audit log.
    ///
    /// The test classifier is built from the configured keyword lists.
    pub fn new(
        gateway: &'a dyn PersistenceGateway,
        employees: &'a [Employee],
        groups: &'a [ProjectGroup],
        config: PlannerConfig,
    ) -> Self {
        Self {
            store: WeeklyAssignmentStore::new(),
            gateway,
            audit: &NULL_AUDIT,
            absence: &NO_ABSENCES,
            classifier: Box::new(KeywordClassifier::from_config(&config)),
            employees,
            groups,
            config,
        }
    }

    /// Sets the audit sink.
    pub fn with_audit(mut self, audit: &'a dyn AuditSink) -> Self {
        self.audit = audit;
        self
    }

    /// Sets the absence calendar.
    pub fn with_absence(mut self, absence: &'a dyn AbsenceLookup) -> Self {
        self.absence = absence;
        self
    }

    /// Replaces the keyword classifier.
    pub fn with_classifier(mut self, classifier: impl TestClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// The in-memory assignments.
    pub fn store(&self) -> &WeeklyAssignmentStore {
        &self.store
    }

    /// Session configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn context(&self) -> PlanningContext<'_> {
        PlanningContext::new(
            self.employees,
            self.groups,
            self.classifier.as_ref(),
            &self.config,
        )
        .with_absence(self.absence)
    }

    fn employee_name(&self, id: &str) -> String {
        self.employees
            .iter()
            .find(|e| e.id == id)
            .map_or_else(|| id.to_string(), |e| e.display_name().to_string())
    }

    fn emit(
        &self,
        action: AuditAction,
        assignment: &ScheduleAssignment,
        before_shift: Option<Shift>,
        after_shift: Option<Shift>,
    ) {
        self.audit.record(AuditEvent {
            action,
            employee_name: self.employee_name(&assignment.employee_id),
            project_name: assignment.group_key.to_string(),
            before_shift,
            after_shift,
            timestamp: Utc::now(),
        });
    }

    fn persist(&self, assignment: &ScheduleAssignment) -> PlannerResult<()> {
        self.gateway.put(assignment).map_err(|e| {
            warn!(id = %assignment.id, error = %e, "persisting assignment failed");
            PlannerError::from(e)
        })
    }

    /// Loads one week from persistence, replacing what the store held.
    ///
    /// Load the weeks before the target week as well to give the engine
    /// history to score against. Returns the number of assignments loaded.
    pub fn load_week(&mut self, week: &WeekKey) -> PlannerResult<usize> {
        let listed = self.gateway.list(week)?;
        let total = listed.len();
        let dropped = self.store.replace_week(*week, listed);
        if dropped > 0 {
            warn!(%week, dropped, "duplicate assignments dropped on load");
        }
        info!(%week, loaded = total - dropped, "week loaded");
        Ok(total - dropped)
    }

    /// Places one assignment, e.g. from a drag-and-drop or a form.
    ///
    /// The shift is taken as given; manual data is not clamped.
    pub fn place(&mut self, command: AssignmentCommand) -> PlannerResult<PlacementOutcome> {
        if !self.employees.iter().any(|e| e.id == command.employee_id) {
            return Err(PlannerError::UnknownEmployee {
                id: command.employee_id,
            });
        }
        if !self.groups.iter().any(|g| g.key == command.group_key) {
            return Err(PlannerError::UnknownGroup {
                key: command.group_key.to_string(),
            });
        }

        let assignment = command.into_assignment();
        match self.store.insert(assignment.clone()) {
            InsertOutcome::Duplicate { existing_id } => {
                info!(%existing_id, "placement already exists");
                Ok(PlacementOutcome::Duplicate { existing_id })
            }
            InsertOutcome::Created(_) => {
                self.persist(&assignment)?;
                self.emit(AuditAction::Create, &assignment, None, Some(assignment.shift));
                info!(
                    id = %assignment.id,
                    employee = %assignment.employee_id,
                    group = %assignment.group_key,
                    "assignment placed"
                );
                Ok(PlacementOutcome::Created(assignment))
            }
        }
    }

    /// Moves an assignment to another shift.
    pub fn move_shift(&mut self, id: &str, shift: Shift) -> PlannerResult<MoveOutcome> {
        let outcome = self.store.move_shift(id, shift)?;
        if let MoveOutcome::Moved { before, after } = outcome {
            let updated = self
                .store
                .get(id)
                .cloned()
                .ok_or_else(|| PlannerError::AssignmentNotFound { id: id.to_string() })?;
            self.persist(&updated)?;
            self.emit(AuditAction::Move, &updated, Some(before), Some(after));
            info!(%id, before = before.index(), after = after.index(), "assignment moved");
        }
        Ok(outcome)
    }

    /// Removes an assignment.
    pub fn remove(&mut self, id: &str) -> PlannerResult<ScheduleAssignment> {
        let removed = self.store.remove(id)?;
        self.gateway.delete(id).map_err(|e| {
            warn!(%id, error = %e, "deleting assignment failed");
            PlannerError::from(e)
        })?;
        self.emit(AuditAction::Remove, &removed, Some(removed.shift), None);
        info!(%id, employee = %removed.employee_id, "assignment removed");
        Ok(removed)
    }

    /// Applies a leave conflict's remediation. Returns the number removed.
    pub fn remove_conflicting(&mut self, conflict: &LeaveConflict) -> PlannerResult<usize> {
        let mut removed = 0;
        for id in conflict.assignment_ids() {
            self.remove(id)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Runs the assignment engine and persists what it created.
    ///
    /// Stops at the first failed write; earlier writes and all in-memory
    /// placements remain.
    pub fn run(&mut self, request: &AssignmentRequest) -> PlannerResult<RunSummary> {
        let summary = {
            let ctx = PlanningContext::new(
                self.employees,
                self.groups,
                self.classifier.as_ref(),
                &self.config,
            )
            .with_absence(self.absence);
            AssignmentEngine::run(request, &ctx, &mut self.store)
        };

        for assignment in &summary.created {
            self.persist(assignment)?;
            self.emit(AuditAction::Create, assignment, None, Some(assignment.shift));
        }
        Ok(summary)
    }

    /// Coverage of every group with demand in `week`.
    pub fn coverage(&self, week: &WeekKey) -> Vec<(GroupKey, CoverageStatus)> {
        let assignments = self.store.week(week);
        self.groups
            .iter()
            .filter(|g| g.has_demand(week))
            .map(|g| {
                let status = staffing_status_with_limit(
                    g,
                    week,
                    assignments,
                    self.classifier.as_ref(),
                    self.config.max_missing_listed,
                );
                (g.key.clone(), status)
            })
            .collect()
    }

    /// Minutes and assignment counts per employee in `week`.
    pub fn workload(&self, week: &WeekKey) -> HashMap<String, EmployeeLoad> {
        compute_workload(week, self.store.week(week), self.groups)
    }

    /// Leave conflicts, rotation suggestions and overlaps in `week`.
    pub fn conflicts(&self, week: &WeekKey) -> ConflictReport {
        conflicts::detect(
            week,
            self.employees,
            &self.store,
            self.absence,
            self.config.shift_system,
        )
    }

    /// Week-level KPIs.
    pub fn kpi(&self, week: &WeekKey) -> WeekKpi {
        let ctx = self.context();
        WeekKpi::calculate(
            week,
            ctx.groups,
            ctx.employees,
            self.store.week(week),
            ctx.classifier,
        )
    }
}

impl std::fmt::Debug for PlanningSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanningSession")
            .field("assignments", &self.store.len())
            .field("employees", &self.employees.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CoverageLevel;
    use crate::engine::RunOutcome;
    use crate::error::GatewayError;
    use crate::gateway::{InMemoryGateway, MemoryAuditLog};
    use crate::models::{
        propose_assignment, AssignmentScope, EmployeeStatus, TestProject, WeeklyDemand,
    };

    fn w10() -> WeekKey {
        WeekKey::new(2026, 10).unwrap()
    }

    fn sample_employees() -> Vec<Employee> {
        vec![
            Employee::new("E1").with_name("Anna"),
            Employee::new("E2").with_name("Piotr"),
        ]
    }

    fn sample_groups() -> Vec<ProjectGroup> {
        vec![
            ProjectGroup::new(GroupKey::new("CustomerX", "TypeY"))
                .with_project(
                    TestProject::new("P1", "CustomerX", "TypeY", "T1")
                        .with_demand(w10(), WeeklyDemand::new(5, 10.0)),
                )
                .with_project(
                    TestProject::new("P2", "CustomerX", "TypeY", "T2")
                        .with_demand(w10(), WeeklyDemand::new(3, 20.0)),
                ),
        ]
    }

    fn key() -> GroupKey {
        GroupKey::new("CustomerX", "TypeY")
    }

    /// Gateway whose writes always fail.
    struct FailingGateway;

    impl PersistenceGateway for FailingGateway {
        fn put(&self, assignment: &ScheduleAssignment) -> Result<(), GatewayError> {
            Err(GatewayError::WriteFailed {
                id: assignment.id.clone(),
                reason: "offline".to_string(),
            })
        }

        fn delete(&self, id: &str) -> Result<(), GatewayError> {
            Err(GatewayError::WriteFailed {
                id: id.to_string(),
                reason: "offline".to_string(),
            })
        }

        fn list(&self, _week: &WeekKey) -> Result<Vec<ScheduleAssignment>, GatewayError> {
            Err(GatewayError::ReadFailed("offline".to_string()))
        }
    }

    #[test]
    fn test_place_persists_and_audits() {
        let employees = sample_employees();
        let groups = sample_groups();
        let gateway = InMemoryGateway::new();
        let audit = MemoryAuditLog::new();
        let mut session =
            PlanningSession::new(&gateway, &employees, &groups, PlannerConfig::default())
                .with_audit(&audit);

        let cmd = propose_assignment("E1", key(), w10(), Shift::SECOND);
        let outcome = session.place(cmd.clone()).unwrap();
        assert!(matches!(outcome, PlacementOutcome::Created(_)));
        assert_eq!(gateway.len(), 1);

        // second identical placement is a no-op
        let again = session.place(cmd).unwrap();
        assert!(matches!(again, PlacementOutcome::Duplicate { .. }));
        assert_eq!(session.store().len(), 1);
        assert_eq!(gateway.len(), 1);

        let events = audit.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, AuditAction::Create);
        assert_eq!(events[0].employee_name, "Anna");
        assert_eq!(events[0].project_name, "CustomerX-TypeY");
        assert_eq!(events[0].after_shift, Some(Shift::SECOND));
    }

    #[test]
    fn test_place_rejects_unknown_references() {
        let employees = sample_employees();
        let groups = sample_groups();
        let gateway = InMemoryGateway::new();
        let mut session =
            PlanningSession::new(&gateway, &employees, &groups, PlannerConfig::default());

        let err = session
            .place(propose_assignment("NOBODY", key(), w10(), Shift::FIRST))
            .unwrap_err();
        assert!(matches!(err, PlannerError::UnknownEmployee { .. }));

        let err = session
            .place(propose_assignment("E1", GroupKey::new("Nope", "X"), w10(), Shift::FIRST))
            .unwrap_err();
        assert!(matches!(err, PlannerError::UnknownGroup { .. }));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_move_and_remove_are_audited() {
        let employees = sample_employees();
        let groups = sample_groups();
        let gateway = InMemoryGateway::new();
        let audit = MemoryAuditLog::new();
        let mut session =
            PlanningSession::new(&gateway, &employees, &groups, PlannerConfig::default())
                .with_audit(&audit);

        let PlacementOutcome::Created(a) = session
            .place(propose_assignment("E1", key(), w10(), Shift::FIRST))
            .unwrap()
        else {
            panic!("expected a new assignment");
        };

        let moved = session.move_shift(&a.id, Shift::THIRD).unwrap();
        assert_eq!(
            moved,
            MoveOutcome::Moved {
                before: Shift::FIRST,
                after: Shift::THIRD
            }
        );
        assert_eq!(gateway.list(&w10()).unwrap()[0].shift, Shift::THIRD);
        assert_eq!(session.move_shift(&a.id, Shift::THIRD).unwrap(), MoveOutcome::Unchanged);

        session.remove(&a.id).unwrap();
        assert!(gateway.is_empty());
        assert!(matches!(
            session.remove(&a.id),
            Err(PlannerError::AssignmentNotFound { .. })
        ));

        let actions: Vec<AuditAction> = audit.events().iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![AuditAction::Create, AuditAction::Move, AuditAction::Remove]
        );
        assert_eq!(audit.events()[2].before_shift, Some(Shift::THIRD));
    }

    #[test]
    fn test_run_persists_created() {
        let employees = sample_employees();
        let groups = sample_groups();
        let gateway = InMemoryGateway::new();
        let audit = MemoryAuditLog::new();
        let mut session =
            PlanningSession::new(&gateway, &employees, &groups, PlannerConfig::default())
                .with_audit(&audit);

        let summary = session.run(&AssignmentRequest::fair(w10())).unwrap();
        assert_eq!(summary.outcome(), RunOutcome::Assigned(2));
        assert_eq!(gateway.len(), 2);
        assert_eq!(audit.events().len(), 2);

        let coverage = session.coverage(&w10());
        assert_eq!(coverage.len(), 1);
        assert_eq!(coverage[0].1.level, CoverageLevel::Full);

        let load = session.workload(&w10());
        assert!((load["E1"].minutes - 55.0).abs() < 1e-10);

        let kpi = session.kpi(&w10());
        assert!((kpi.coverage_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let employees = sample_employees();
        let groups = sample_groups();
        let gateway = FailingGateway;
        let mut session =
            PlanningSession::new(&gateway, &employees, &groups, PlannerConfig::default());

        let err = session
            .place(propose_assignment("E1", key(), w10(), Shift::FIRST))
            .unwrap_err();
        assert!(matches!(err, PlannerError::Gateway(GatewayError::WriteFailed { .. })));
        // no rollback
        assert_eq!(session.store().len(), 1);

        assert!(matches!(
            session.load_week(&w10()),
            Err(PlannerError::Gateway(GatewayError::ReadFailed(_)))
        ));

        let mut fresh =
            PlanningSession::new(&gateway, &employees, &groups, PlannerConfig::default());
        let err = fresh.run(&AssignmentRequest::fair(w10())).unwrap_err();
        assert!(matches!(err, PlannerError::Gateway(_)));
        // the engine's placements stay in memory
        assert_eq!(fresh.store().len(), 2);
    }

    #[test]
    fn test_load_week_replaces_store() {
        let employees = sample_employees();
        let groups = sample_groups();
        let gateway = InMemoryGateway::new();
        gateway
            .put(&ScheduleAssignment::new(
                "E2",
                key(),
                w10(),
                Shift::FIRST,
                AssignmentScope::AuditOnly,
            ))
            .unwrap();
        let mut session =
            PlanningSession::new(&gateway, &employees, &groups, PlannerConfig::default());

        assert_eq!(session.load_week(&w10()).unwrap(), 1);
        assert_eq!(session.store().week(&w10())[0].employee_id, "E2");
    }

    #[test]
    fn test_leave_conflict_remediation() {
        let employees = vec![
            Employee::new("E1").with_status(EmployeeStatus::Vacation),
            Employee::new("E2"),
        ];
        let groups = sample_groups();
        let gateway = InMemoryGateway::new();
        let mut session =
            PlanningSession::new(&gateway, &employees, &groups, PlannerConfig::default());

        session
            .place(
                propose_assignment("E1", key(), w10(), Shift::FIRST)
                    .with_scope(AssignmentScope::SpecificTest("T1".into())),
            )
            .unwrap();
        session
            .place(propose_assignment("E1", key(), w10(), Shift::FIRST))
            .unwrap();

        let report = session.conflicts(&w10());
        assert_eq!(report.leave.len(), 1);
        assert_eq!(session.remove_conflicting(&report.leave[0]).unwrap(), 2);
        assert!(session.store().is_empty());
        assert!(gateway.is_empty());
        assert!(session.conflicts(&w10()).leave.is_empty());
    }
}
