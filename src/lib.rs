//! # Reconciliation Core
//!
//! A bank reconciliation library that matches ledger entries against
//! bank-statement entries using date and amount tolerance windows.
//!
//! ## Features
//!
//! - **Input normalization**: locale-aware date and amount parsing with
//!   per-row error collection (a bad row never aborts the batch)
//! - **Deterministic matching**: greedy one-to-one candidate matching with
//!   fully specified tie-breaks, reproducible byte for byte
//! - **Report aggregation**: matched pairs, unmatched partitions, totals
//!   and the residual difference
//! - **Run workflow**: an explicit step machine from statement-kind
//!   selection through execution
//! - **Storage abstraction**: backend-agnostic run history with in-memory
//!   and primary/fallback implementations
//! - **Spreadsheet boundary**: CSV import of raw rows and export of the
//!   full report
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{
//!     match_entries, Entry, EntrySide, ToleranceConfig,
//! };
//! use chrono::NaiveDate;
//!
//! let ledger = vec![Entry::new(
//!     EntrySide::Ledger,
//!     1,
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     150_000,
//!     "invoice 1001".to_string(),
//! )];
//! let statement = vec![Entry::new(
//!     EntrySide::Statement,
//!     1,
//!     NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
//!     150_000,
//!     "transfer".to_string(),
//! )];
//!
//! let matched = match_entries(&ledger, &statement, &ToleranceConfig::default());
//! assert_eq!(matched.len(), 1);
//! assert_eq!(matched[0].date_delta_days, 14);
//! ```

pub mod engine;
pub mod matcher;
pub mod normalize;
pub mod report;
pub mod session;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use engine::ReconciliationEngine;
pub use matcher::{match_entries, within_tolerance};
pub use normalize::{normalize_rows, parse_amount_minor, parse_date, NormalizedBatch, RawRow};
pub use report::{build_report, format_amount_minor, read_rows_csv, report_rows, write_report_csv};
pub use session::{ReconciliationSession, SessionStep};
pub use traits::*;
pub use types::*;
