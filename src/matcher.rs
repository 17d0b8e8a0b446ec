//! Candidate matcher: deterministic one-to-one pairing under tolerances
//!
//! Greedy policy: ledger entries are walked in ascending date order
//! (original input order breaks ties), each one claiming its best
//! still-unclaimed statement candidate. Candidates are ranked by amount
//! delta, then date delta, then original statement order. The tie-break
//! rules are load-bearing: reports must be reproducible byte for byte
//! given identical inputs and tolerances.

use crate::types::{Entry, MatchResult, ToleranceConfig};

/// Absolute deltas between a ledger and a statement entry
fn deltas(ledger: &Entry, statement: &Entry) -> (u32, i64) {
    let date_delta = (ledger.date - statement.date).num_days().unsigned_abs() as u32;
    let amount_delta = (ledger.amount_minor - statement.amount_minor).abs();
    (date_delta, amount_delta)
}

/// True when both deltas fall inside the (inclusive) tolerance bounds
pub fn within_tolerance(ledger: &Entry, statement: &Entry, tol: &ToleranceConfig) -> bool {
    let (date_delta, amount_delta) = deltas(ledger, statement);
    date_delta <= tol.max_date_delta_days && amount_delta <= tol.max_amount_delta_minor
}

/// Produce a greedy one-to-one matching between ledger and statement entries
///
/// Pure function: inputs are untouched, no entry appears in more than one
/// result, and identical inputs always yield identical output including
/// ordering. Zero tolerance degenerates to exact date and amount matching.
/// Candidate search is a full scan per ledger entry; entry counts in this
/// domain stay small enough that bucketing by date is not worth it.
pub fn match_entries(
    ledger: &[Entry],
    statement: &[Entry],
    tol: &ToleranceConfig,
) -> Vec<MatchResult> {
    // Stable processing order: ascending date, then original input order
    let mut ledger_order: Vec<usize> = (0..ledger.len()).collect();
    ledger_order.sort_by_key(|&i| (ledger[i].date, i));

    let mut claimed = vec![false; statement.len()];
    let mut matched = Vec::new();

    for li in ledger_order {
        let ledger_entry = &ledger[li];

        // Best = (amount_delta, date_delta, statement index), minimized
        let mut best: Option<(i64, u32, usize)> = None;

        for (si, statement_entry) in statement.iter().enumerate() {
            if claimed[si] {
                continue;
            }
            let (date_delta, amount_delta) = deltas(ledger_entry, statement_entry);
            if date_delta > tol.max_date_delta_days || amount_delta > tol.max_amount_delta_minor {
                continue;
            }
            let candidate = (amount_delta, date_delta, si);
            if best.is_none_or(|b| candidate < b) {
                best = Some(candidate);
            }
        }

        if let Some((amount_delta, date_delta, si)) = best {
            claimed[si] = true;
            matched.push(MatchResult {
                ledger: ledger_entry.clone(),
                statement: statement[si].clone(),
                date_delta_days: date_delta,
                amount_delta_minor: amount_delta,
            });
        }
    }

    matched
}
