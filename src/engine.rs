//! Reconciliation engine: session workflow plus persisted run history
//!
//! Wraps a [`ReconciliationSession`] and a [`RunStore`] so callers get the
//! whole workflow behind one type: walk the steps, execute, and the run is
//! saved; earlier runs stay queryable. Collaborators are injected at
//! construction, never discovered from ambient state.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::normalize::RawRow;
use crate::session::{ReconciliationSession, SessionStep};
use crate::traits::{DefaultToleranceValidator, RunQuery, RunStore, ToleranceValidator};
use crate::types::*;

/// Orchestrates reconciliation runs against a storage backend
pub struct ReconciliationEngine<S: RunStore> {
    store: S,
    session: ReconciliationSession,
    validator: Box<dyn ToleranceValidator>,
}

impl<S: RunStore> ReconciliationEngine<S> {
    /// Create an engine with the given storage backend
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: ReconciliationSession::new(),
            validator: Box::new(DefaultToleranceValidator),
        }
    }

    /// Create an engine with a custom tolerance validator
    pub fn with_validator(store: S, validator: Box<dyn ToleranceValidator>) -> Self {
        Self {
            store,
            session: ReconciliationSession::new(),
            validator,
        }
    }

    /// The in-progress session
    pub fn session(&self) -> &ReconciliationSession {
        &self.session
    }

    // Workflow operations, delegating to the session step machine

    /// Choose the statement kind for the next run
    pub fn select_kind(&mut self, kind: StatementKind) -> ReconResult<()> {
        self.session.select_kind(kind)
    }

    /// Load the ledger side; returns the number of parsed entries
    pub fn load_ledger(&mut self, rows: &[RawRow]) -> ReconResult<usize> {
        self.session.load_ledger(rows)
    }

    /// Load the statement side; returns the number of parsed entries
    pub fn load_statement(&mut self, rows: &[RawRow]) -> ReconResult<usize> {
        self.session.load_statement(rows)
    }

    /// Fix the tolerances for the run
    pub fn set_tolerances(&mut self, tolerance: ToleranceConfig) -> ReconResult<()> {
        self.validator.validate_tolerance(&tolerance)?;
        self.session.set_tolerances(tolerance)
    }

    /// Execute the run and persist it; returns the stored record
    pub async fn execute(&mut self) -> ReconResult<ReconciliationRun> {
        let kind = self.session.kind().ok_or_else(|| ReconError::InvalidStep {
            expected: SessionStep::Ready.to_string(),
            actual: self.session.step().to_string(),
        })?;
        let tolerance = self.session.tolerance();
        let report = self.session.execute()?.clone();

        let run = ReconciliationRun::new(kind, tolerance, report);
        self.store.save_run(&run).await?;
        Ok(run)
    }

    /// Discard the current session and start over
    pub fn reset(&mut self) {
        self.session.reset();
    }

    // Run history operations

    /// List stored runs, newest first
    pub async fn history(&self, query: &RunQuery) -> ReconResult<Vec<ReconciliationRun>> {
        self.store.list_runs(query).await
    }

    /// List stored runs for a date range, newest first
    pub async fn history_between(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ReconResult<Vec<ReconciliationRun>> {
        self.store
            .list_runs(&RunQuery {
                kind: None,
                from,
                to,
            })
            .await
    }

    /// Fetch a stored run
    pub async fn get_run(&self, id: Uuid) -> ReconResult<Option<ReconciliationRun>> {
        self.store.get_run(id).await
    }

    /// Delete a stored run
    pub async fn delete_run(&mut self, id: Uuid) -> ReconResult<()> {
        self.store.delete_run(id).await
    }
}
