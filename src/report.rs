//! Result aggregator and tabular export
//!
//! Builds the [`ReconciliationReport`] from the full entry sets and the
//! match set, and converts reports to and from the spreadsheet codec
//! boundary (rows of strings, CSV on disk).

use std::collections::HashSet;
use std::io::{Read, Write};

use crate::normalize::RawRow;
use crate::types::{Entry, MatchResult, ReconError, ReconResult, ReconciliationReport};

/// Build a report from the loaded entries and the committed matches
///
/// Pure and idempotent: running it twice on the same inputs yields
/// identical output. Unmatched partitions preserve original input order.
/// Totals sum every loaded entry regardless of matching outcome.
pub fn build_report(
    ledger: &[Entry],
    statement: &[Entry],
    matched: Vec<MatchResult>,
) -> ReconciliationReport {
    let matched_ledger: HashSet<&str> = matched.iter().map(|m| m.ledger.id.as_str()).collect();
    let matched_statement: HashSet<&str> =
        matched.iter().map(|m| m.statement.id.as_str()).collect();

    let unmatched_ledger: Vec<Entry> = ledger
        .iter()
        .filter(|e| !matched_ledger.contains(e.id.as_str()))
        .cloned()
        .collect();
    let unmatched_statement: Vec<Entry> = statement
        .iter()
        .filter(|e| !matched_statement.contains(e.id.as_str()))
        .cloned()
        .collect();

    let total_ledger: i64 = ledger.iter().map(|e| e.amount_minor).sum();
    let total_statement: i64 = statement.iter().map(|e| e.amount_minor).sum();

    ReconciliationReport {
        matched,
        unmatched_ledger,
        unmatched_statement,
        total_ledger,
        total_statement,
        difference: total_ledger - total_statement,
    }
}

/// Render minor units in the same locale the normalizer parses: comma
/// decimal separator, two decimal places, no grouping
pub fn format_amount_minor(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{}{},{:02}", sign, abs / 100, abs % 100)
}

const EXPORT_HEADER: [&str; 9] = [
    "section",
    "ledger_id",
    "ledger_date",
    "ledger_amount",
    "statement_id",
    "statement_date",
    "statement_amount",
    "date_delta_days",
    "amount_delta",
];

/// Flatten a report into exportable rows: header, the three partitions,
/// then summary totals
pub fn report_rows(report: &ReconciliationReport) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(
        1 + report.matched.len()
            + report.unmatched_ledger.len()
            + report.unmatched_statement.len()
            + 3,
    );
    rows.push(EXPORT_HEADER.iter().map(|s| s.to_string()).collect());

    for m in &report.matched {
        rows.push(vec![
            "matched".to_string(),
            m.ledger.id.clone(),
            m.ledger.date.to_string(),
            format_amount_minor(m.ledger.amount_minor),
            m.statement.id.clone(),
            m.statement.date.to_string(),
            format_amount_minor(m.statement.amount_minor),
            m.date_delta_days.to_string(),
            format_amount_minor(m.amount_delta_minor),
        ]);
    }
    for e in &report.unmatched_ledger {
        rows.push(vec![
            "unmatched_ledger".to_string(),
            e.id.clone(),
            e.date.to_string(),
            format_amount_minor(e.amount_minor),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]);
    }
    for e in &report.unmatched_statement {
        rows.push(vec![
            "unmatched_statement".to_string(),
            String::new(),
            String::new(),
            String::new(),
            e.id.clone(),
            e.date.to_string(),
            format_amount_minor(e.amount_minor),
            String::new(),
            String::new(),
        ]);
    }

    rows.push(summary_row("total_ledger", report.total_ledger));
    rows.push(summary_row("total_statement", report.total_statement));
    rows.push(summary_row("difference", report.difference));
    rows
}

fn summary_row(label: &str, amount_minor: i64) -> Vec<String> {
    let mut row = vec![label.to_string()];
    row.resize(3, String::new());
    row.push(format_amount_minor(amount_minor));
    row.resize(EXPORT_HEADER.len(), String::new());
    row
}

/// Write a report as CSV
pub fn write_report_csv<W: Write>(report: &ReconciliationReport, writer: W) -> ReconResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    for row in report_rows(report) {
        out.write_record(&row)
            .map_err(|e| ReconError::Export(e.to_string()))?;
    }
    out.flush().map_err(|e| ReconError::Export(e.to_string()))
}

/// Read raw entry rows from CSV at the import boundary
///
/// Columns map positionally to date, amount, description; a header row is
/// expected and skipped. Row numbers are 1-based over data rows, matching
/// what the normalizer reports in row errors.
pub fn read_rows_csv<R: Read>(reader: R) -> ReconResult<Vec<RawRow>> {
    let mut input = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, record) in input.records().enumerate() {
        let record = record.map_err(|e| ReconError::Export(e.to_string()))?;
        rows.push(RawRow::new(
            i + 1,
            record.get(0).unwrap_or(""),
            record.get(1).unwrap_or(""),
            record.get(2).unwrap_or(""),
        ));
    }
    Ok(rows)
}
