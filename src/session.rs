//! Explicit reconciliation run state machine
//!
//! `SelectKind -> LoadLedger -> LoadStatement -> SetTolerances -> Ready ->
//! Executed`, with `reset` returning to the start. Each forward operation
//! checks the prior step's preconditions; violations surface as
//! [`ReconError::InvalidStep`] and leave the session untouched. The struct
//! replaces what used to be ambient global step/tolerance state in the UI.

use serde::{Deserialize, Serialize};

use crate::matcher::match_entries;
use crate::normalize::{normalize_rows, RawRow};
use crate::report::build_report;
use crate::types::{
    Entry, EntrySide, ReconError, ReconResult, ReconciliationReport, RowError, StatementKind,
    ToleranceConfig,
};

/// Where a session currently is in the run workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStep {
    SelectKind,
    LoadLedger,
    LoadStatement,
    SetTolerances,
    Ready,
    Executed,
}

impl std::fmt::Display for SessionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionStep::SelectKind => "select_kind",
            SessionStep::LoadLedger => "load_ledger",
            SessionStep::LoadStatement => "load_statement",
            SessionStep::SetTolerances => "set_tolerances",
            SessionStep::Ready => "ready",
            SessionStep::Executed => "executed",
        };
        write!(f, "{name}")
    }
}

/// State for one reconciliation run
///
/// Entries are created by loading rows, consumed by a single `execute`,
/// and discarded on `reset`. No two runs share state.
#[derive(Debug, Clone)]
pub struct ReconciliationSession {
    step: SessionStep,
    kind: Option<StatementKind>,
    ledger: Vec<Entry>,
    statement: Vec<Entry>,
    tolerance: ToleranceConfig,
    row_errors: Vec<RowError>,
    report: Option<ReconciliationReport>,
}

impl ReconciliationSession {
    pub fn new() -> Self {
        Self {
            step: SessionStep::SelectKind,
            kind: None,
            ledger: Vec::new(),
            statement: Vec::new(),
            tolerance: ToleranceConfig::default(),
            row_errors: Vec::new(),
            report: None,
        }
    }

    fn expect_step(&self, expected: SessionStep) -> ReconResult<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(ReconError::InvalidStep {
                expected: expected.to_string(),
                actual: self.step.to_string(),
            })
        }
    }

    /// Current workflow step
    pub fn step(&self) -> SessionStep {
        self.step
    }

    /// Kind chosen for this run, once selected
    pub fn kind(&self) -> Option<StatementKind> {
        self.kind
    }

    /// Row-level parse errors accumulated while loading both sides
    pub fn row_errors(&self) -> &[RowError] {
        &self.row_errors
    }

    /// Tolerances the run will execute with
    pub fn tolerance(&self) -> ToleranceConfig {
        self.tolerance
    }

    /// The computed report, available after `execute`
    pub fn report(&self) -> Option<&ReconciliationReport> {
        self.report.as_ref()
    }

    /// Step 1: choose what kind of statement is being reconciled
    pub fn select_kind(&mut self, kind: StatementKind) -> ReconResult<()> {
        self.expect_step(SessionStep::SelectKind)?;
        self.kind = Some(kind);
        self.step = SessionStep::LoadLedger;
        Ok(())
    }

    /// Step 2: load and normalize the ledger rows
    ///
    /// Row-level errors are retained for reporting but only an entirely
    /// unparseable file blocks progression.
    pub fn load_ledger(&mut self, rows: &[RawRow]) -> ReconResult<usize> {
        self.expect_step(SessionStep::LoadLedger)?;
        let batch = normalize_rows(EntrySide::Ledger, rows);
        if batch.is_empty() {
            self.row_errors.extend(batch.errors);
            return Err(ReconError::EmptyInput(EntrySide::Ledger));
        }
        let loaded = batch.entries.len();
        self.ledger = batch.entries;
        self.row_errors.extend(batch.errors);
        self.step = SessionStep::LoadStatement;
        Ok(loaded)
    }

    /// Step 3: load and normalize the statement rows
    pub fn load_statement(&mut self, rows: &[RawRow]) -> ReconResult<usize> {
        self.expect_step(SessionStep::LoadStatement)?;
        let batch = normalize_rows(EntrySide::Statement, rows);
        if batch.is_empty() {
            self.row_errors.extend(batch.errors);
            return Err(ReconError::EmptyInput(EntrySide::Statement));
        }
        let loaded = batch.entries.len();
        self.statement = batch.entries;
        self.row_errors.extend(batch.errors);
        self.step = SessionStep::SetTolerances;
        Ok(loaded)
    }

    /// Step 4: fix the tolerances for this run
    pub fn set_tolerances(&mut self, tolerance: ToleranceConfig) -> ReconResult<()> {
        self.expect_step(SessionStep::SetTolerances)?;
        tolerance.validate()?;
        self.tolerance = tolerance;
        self.step = SessionStep::Ready;
        Ok(())
    }

    /// Step 5: run the matcher and aggregate the report
    ///
    /// One run per input set; executing again requires `reset`.
    pub fn execute(&mut self) -> ReconResult<&ReconciliationReport> {
        self.expect_step(SessionStep::Ready)?;
        let matched = match_entries(&self.ledger, &self.statement, &self.tolerance);
        let report = build_report(&self.ledger, &self.statement, matched);
        self.step = SessionStep::Executed;
        Ok(self.report.insert(report))
    }

    /// Discard all run state and return to the first step
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ReconciliationSession {
    fn default() -> Self {
        Self::new()
    }
}
