//! Core types and data structures for the reconciliation system

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which record set an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySide {
    /// Internal accounting records (the ledger being reconciled)
    Ledger,
    /// External bank-provided records (the statement)
    Statement,
}

impl EntrySide {
    /// Short prefix used when deriving entry ids
    pub fn prefix(&self) -> &'static str {
        match self {
            EntrySide::Ledger => "L",
            EntrySide::Statement => "S",
        }
    }
}

impl std::fmt::Display for EntrySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntrySide::Ledger => write!(f, "ledger"),
            EntrySide::Statement => write!(f, "statement"),
        }
    }
}

/// Kind of statement being reconciled, chosen at the start of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Current/checking account extract
    BankAccount,
    /// Credit card statement
    CreditCard,
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementKind::BankAccount => write!(f, "bank_account"),
            StatementKind::CreditCard => write!(f, "credit_card"),
        }
    }
}

/// A single normalized record from either side
///
/// Amounts are signed integers in minor currency units (cents) so that
/// tolerance arithmetic never suffers float drift. Entries are immutable
/// once built by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Identifier derived from side and source row, e.g. `L-3`
    pub id: String,
    /// Date the movement was recorded
    pub date: NaiveDate,
    /// Signed amount in minor units
    pub amount_minor: i64,
    /// Free-text description from the source row
    pub description: String,
    /// Row number in the uploaded file this entry came from
    pub source_row: usize,
}

impl Entry {
    /// Create an entry, deriving its id from side and source row
    pub fn new(
        side: EntrySide,
        source_row: usize,
        date: NaiveDate,
        amount_minor: i64,
        description: String,
    ) -> Self {
        Self {
            id: format!("{}-{}", side.prefix(), source_row),
            date,
            amount_minor,
            description,
            source_row,
        }
    }
}

/// Maximum allowed deviation for two entries to be considered a match
///
/// Supplied once per reconciliation run and immutable for that run. Both
/// bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToleranceConfig {
    /// Maximum date distance in days
    pub max_date_delta_days: u32,
    /// Maximum amount distance in minor units
    pub max_amount_delta_minor: i64,
}

impl Default for ToleranceConfig {
    /// 30 days and 200.00 in a two-decimal currency
    fn default() -> Self {
        Self {
            max_date_delta_days: 30,
            max_amount_delta_minor: 20_000,
        }
    }
}

impl ToleranceConfig {
    /// Validate that the configured bounds are usable
    pub fn validate(&self) -> ReconResult<()> {
        if self.max_amount_delta_minor < 0 {
            return Err(ReconError::Validation(
                "amount tolerance cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// A committed pairing between one ledger entry and one statement entry
///
/// Only the matcher constructs these. No entry ever appears in more than
/// one match result within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub ledger: Entry,
    pub statement: Entry,
    /// Absolute date distance in days
    pub date_delta_days: u32,
    /// Absolute amount distance in minor units
    pub amount_delta_minor: i64,
}

/// Outcome of a reconciliation run
///
/// Derived from the entry sets and the match set; recomputed each run and
/// never mutated in place. Totals cover all loaded entries, matched or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub matched: Vec<MatchResult>,
    pub unmatched_ledger: Vec<Entry>,
    pub unmatched_statement: Vec<Entry>,
    /// Sum of all ledger entry amounts in minor units
    pub total_ledger: i64,
    /// Sum of all statement entry amounts in minor units
    pub total_statement: i64,
    /// `total_ledger - total_statement`
    pub difference: i64,
}

impl ReconciliationReport {
    /// True when every entry on both sides found a counterpart and the
    /// totals cancel out
    pub fn is_fully_reconciled(&self) -> bool {
        self.unmatched_ledger.is_empty()
            && self.unmatched_statement.is_empty()
            && self.difference == 0
    }
}

/// A persisted reconciliation run, as stored through the [`crate::RunStore`]
/// boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRun {
    /// Unique identifier for the run
    pub id: Uuid,
    /// Kind of statement that was reconciled
    pub kind: StatementKind,
    /// Tolerances the run was executed with
    pub tolerance: ToleranceConfig,
    /// The computed report
    pub report: ReconciliationReport,
    /// When the run was executed
    pub executed_at: NaiveDateTime,
}

impl ReconciliationRun {
    /// Wrap a freshly computed report for persistence
    pub fn new(
        kind: StatementKind,
        tolerance: ToleranceConfig,
        report: ReconciliationReport,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            tolerance,
            report,
            executed_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// A row-level parse failure reported by the normalizer
///
/// Collected per row; a bad row never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Row number in the uploaded file
    pub row: usize,
    /// Which field failed to parse (`date` or `amount`)
    pub field: String,
    /// Human-readable description including the offending text
    pub message: String,
}

/// Errors that can occur in the reconciliation system
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid step: expected {expected}, session is at {actual}")]
    InvalidStep { expected: String, actual: String },
    #[error("Run not found: {0}")]
    RunNotFound(Uuid),
    #[error("No parseable {0} entries in the uploaded file")]
    EmptyInput(EntrySide),
    #[error("Export error: {0}")]
    Export(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_derivation() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let ledger = Entry::new(EntrySide::Ledger, 7, date, 1500, "rent".to_string());
        let statement = Entry::new(EntrySide::Statement, 7, date, 1500, "rent".to_string());
        assert_eq!(ledger.id, "L-7");
        assert_eq!(statement.id, "S-7");
    }

    #[test]
    fn default_tolerance_matches_documented_values() {
        let tol = ToleranceConfig::default();
        assert_eq!(tol.max_date_delta_days, 30);
        assert_eq!(tol.max_amount_delta_minor, 20_000);
        assert!(tol.validate().is_ok());
    }

    #[test]
    fn negative_amount_tolerance_rejected() {
        let tol = ToleranceConfig {
            max_date_delta_days: 0,
            max_amount_delta_minor: -1,
        };
        assert!(matches!(tol.validate(), Err(ReconError::Validation(_))));
    }

    #[test]
    fn report_serializes_round_trip() {
        let report = ReconciliationReport {
            matched: vec![],
            unmatched_ledger: vec![],
            unmatched_statement: vec![],
            total_ledger: 100,
            total_statement: 40,
            difference: 60,
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: ReconciliationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
        assert!(!report.is_fully_reconciled());
    }
}
