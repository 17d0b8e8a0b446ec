//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::types::*;

/// Filter for listing persisted runs
#[derive(Debug, Clone, Copy, Default)]
pub struct RunQuery {
    /// Only runs of this statement kind
    pub kind: Option<StatementKind>,
    /// Only runs executed on or after this date
    pub from: Option<NaiveDate>,
    /// Only runs executed on or before this date
    pub to: Option<NaiveDate>,
}

impl RunQuery {
    /// Whether a run satisfies the filter
    pub fn accepts(&self, run: &ReconciliationRun) -> bool {
        if let Some(kind) = self.kind {
            if run.kind != kind {
                return false;
            }
        }
        let date = run.executed_at.date();
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}

/// Storage abstraction for reconciliation run history
///
/// This trait lets the reconciliation core work with any backend (a hosted
/// table service, browser-local storage, in-memory, etc.) by implementing
/// these methods. Failures surface as [`ReconError::Storage`] values and
/// never cross the boundary as panics.
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Save a run to storage
    async fn save_run(&mut self, run: &ReconciliationRun) -> ReconResult<()>;

    /// Get a run by id
    async fn get_run(&self, id: Uuid) -> ReconResult<Option<ReconciliationRun>>;

    /// List runs matching the query, newest first
    async fn list_runs(&self, query: &RunQuery) -> ReconResult<Vec<ReconciliationRun>>;

    /// Update an existing run
    async fn update_run(&mut self, run: &ReconciliationRun) -> ReconResult<()>;

    /// Delete a run
    async fn delete_run(&mut self, id: Uuid) -> ReconResult<()>;
}

/// Trait for implementing custom tolerance validation rules
pub trait ToleranceValidator: Send + Sync {
    /// Validate a tolerance configuration before a run accepts it
    fn validate_tolerance(&self, tolerance: &ToleranceConfig) -> ReconResult<()>;
}

/// Default tolerance validator with the basic non-negativity rule
pub struct DefaultToleranceValidator;

impl ToleranceValidator for DefaultToleranceValidator {
    fn validate_tolerance(&self, tolerance: &ToleranceConfig) -> ReconResult<()> {
        tolerance.validate()
    }
}

/// Validator that additionally caps tolerances at sane upper bounds
///
/// A date window wider than a year or an amount window wider than the
/// typical entry amounts defeats the purpose of tolerance matching.
pub struct BoundedToleranceValidator {
    pub max_date_window_days: u32,
    pub max_amount_window_minor: i64,
}

impl Default for BoundedToleranceValidator {
    fn default() -> Self {
        Self {
            max_date_window_days: 365,
            max_amount_window_minor: 1_000_000,
        }
    }
}

impl ToleranceValidator for BoundedToleranceValidator {
    fn validate_tolerance(&self, tolerance: &ToleranceConfig) -> ReconResult<()> {
        tolerance.validate()?;
        if tolerance.max_date_delta_days > self.max_date_window_days {
            return Err(ReconError::Validation(format!(
                "date tolerance {} exceeds the allowed maximum of {} days",
                tolerance.max_date_delta_days, self.max_date_window_days
            )));
        }
        if tolerance.max_amount_delta_minor > self.max_amount_window_minor {
            return Err(ReconError::Validation(format!(
                "amount tolerance {} exceeds the allowed maximum of {} minor units",
                tolerance.max_amount_delta_minor, self.max_amount_window_minor
            )));
        }
        Ok(())
    }
}
