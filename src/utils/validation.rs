//! Validation utilities

use crate::normalize::RawRow;
use crate::types::*;

/// Validate a tolerance configuration
pub fn validate_tolerance(tolerance: &ToleranceConfig) -> ReconResult<()> {
    tolerance.validate()
}

/// Validate that an uploaded file produced at least one row
pub fn validate_rows_present(side: EntrySide, rows: &[RawRow]) -> ReconResult<()> {
    if rows.is_empty() {
        Err(ReconError::EmptyInput(side))
    } else {
        Ok(())
    }
}

/// Validate an entry description for storage
pub fn validate_description(description: &str) -> ReconResult<()> {
    if description.len() > 500 {
        return Err(ReconError::Validation(
            "Description cannot exceed 500 characters".to_string(),
        ));
    }
    Ok(())
}

/// Summarize a batch of row errors for display
pub fn summarize_row_errors(errors: &[RowError]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    let preview: Vec<String> = errors
        .iter()
        .take(5)
        .map(|e| format!("row {}: {}", e.row, e.message))
        .collect();
    let mut summary = format!("{} row(s) could not be parsed: {}", errors.len(), preview.join("; "));
    if errors.len() > preview.len() {
        summary.push_str(&format!(" (and {} more)", errors.len() - preview.len()));
    }
    Some(summary)
}
