//! Integration tests for reconciliation-core

use reconciliation_core::{
    match_entries, read_rows_csv, report_rows, write_report_csv,
    utils::{FallbackRunStore, MemoryRunStore},
    ReconciliationEngine, RunQuery, RunStore, StatementKind, ToleranceConfig,
};

fn ledger_csv() -> &'static str {
    "date,amount,description\n\
     01/03/2024,\"1.500,00\",invoice 1001\n\
     05/03/2024,\"-400,00\",supplier payment\n\
     20/03/2024,\"999,99\",invoice 1002\n"
}

fn statement_csv() -> &'static str {
    "date,amount,description\n\
     02/03/2024,\"1.500,00\",transfer in\n\
     06/03/2024,\"-400,00\",transfer out\n\
     28/03/2024,\"10,00\",bank fee\n"
}

#[tokio::test]
async fn test_complete_reconciliation_workflow() {
    let mut engine = ReconciliationEngine::new(MemoryRunStore::new());

    engine.select_kind(StatementKind::BankAccount).unwrap();

    let ledger_rows = read_rows_csv(ledger_csv().as_bytes()).unwrap();
    let statement_rows = read_rows_csv(statement_csv().as_bytes()).unwrap();
    assert_eq!(engine.load_ledger(&ledger_rows).unwrap(), 3);
    assert_eq!(engine.load_statement(&statement_rows).unwrap(), 3);

    engine
        .set_tolerances(ToleranceConfig {
            max_date_delta_days: 3,
            max_amount_delta_minor: 0,
        })
        .unwrap();

    let run = engine.execute().await.unwrap();
    let report = &run.report;

    assert_eq!(report.matched.len(), 2);
    assert_eq!(report.unmatched_ledger.len(), 1);
    assert_eq!(report.unmatched_statement.len(), 1);
    assert_eq!(report.unmatched_ledger[0].description, "invoice 1002");
    assert_eq!(report.unmatched_statement[0].description, "bank fee");

    // Totals cover all loaded entries, matched or not
    assert_eq!(report.total_ledger, 150_000 - 40_000 + 99_999);
    assert_eq!(report.total_statement, 150_000 - 40_000 + 1_000);
    assert_eq!(report.difference, 98_999);

    // Matched deltas stay within the configured tolerances
    for m in &report.matched {
        assert!(m.date_delta_days <= 3);
        assert_eq!(m.amount_delta_minor, 0);
    }

    // The run is in history
    let history = engine.history(&RunQuery::default()).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, run.id);
}

#[tokio::test]
async fn test_no_entry_is_claimed_twice() {
    let ledger_rows = read_rows_csv(ledger_csv().as_bytes()).unwrap();
    let statement_rows = read_rows_csv(statement_csv().as_bytes()).unwrap();

    let mut engine = ReconciliationEngine::new(MemoryRunStore::new());
    engine.select_kind(StatementKind::BankAccount).unwrap();
    engine.load_ledger(&ledger_rows).unwrap();
    engine.load_statement(&statement_rows).unwrap();
    engine.set_tolerances(ToleranceConfig::default()).unwrap();

    let run = engine.execute().await.unwrap();
    let mut seen = std::collections::HashSet::new();
    for m in &run.report.matched {
        assert!(seen.insert(m.ledger.id.clone()), "ledger entry claimed twice");
        assert!(
            seen.insert(m.statement.id.clone()),
            "statement entry claimed twice"
        );
    }

    // Partition counts add up on both sides
    assert_eq!(
        run.report.matched.len() + run.report.unmatched_ledger.len(),
        3
    );
    assert_eq!(
        run.report.matched.len() + run.report.unmatched_statement.len(),
        3
    );
}

#[tokio::test]
async fn test_two_identical_runs_serialize_identically() {
    let ledger_rows = read_rows_csv(ledger_csv().as_bytes()).unwrap();
    let statement_rows = read_rows_csv(statement_csv().as_bytes()).unwrap();

    let mut reports = Vec::new();
    for _ in 0..2 {
        let mut engine = ReconciliationEngine::new(MemoryRunStore::new());
        engine.select_kind(StatementKind::BankAccount).unwrap();
        engine.load_ledger(&ledger_rows).unwrap();
        engine.load_statement(&statement_rows).unwrap();
        engine.set_tolerances(ToleranceConfig::default()).unwrap();
        reports.push(engine.execute().await.unwrap().report);
    }

    let first = serde_json::to_vec(&reports[0]).unwrap();
    let second = serde_json::to_vec(&reports[1]).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_report_round_trips_through_csv() {
    let ledger_rows = read_rows_csv(ledger_csv().as_bytes()).unwrap();
    let statement_rows = read_rows_csv(statement_csv().as_bytes()).unwrap();

    let mut engine = ReconciliationEngine::new(MemoryRunStore::new());
    engine.select_kind(StatementKind::BankAccount).unwrap();
    engine.load_ledger(&ledger_rows).unwrap();
    engine.load_statement(&statement_rows).unwrap();
    engine.set_tolerances(ToleranceConfig::default()).unwrap();
    let run = engine.execute().await.unwrap();

    let mut buf = Vec::new();
    write_report_csv(&run.report, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let rows = report_rows(&run.report);
    // One CSV line per exported row
    assert_eq!(text.lines().count(), rows.len());
    assert!(text.lines().last().unwrap().starts_with("difference"));
}

#[tokio::test]
async fn test_fallback_store_keeps_history_available() {
    let remote = MemoryRunStore::new();
    let local = MemoryRunStore::new();
    let remote_handle = remote.clone();
    let local_handle = local.clone();

    let mut engine = ReconciliationEngine::new(FallbackRunStore::new(remote, local));
    engine.select_kind(StatementKind::BankAccount).unwrap();
    engine
        .load_ledger(&read_rows_csv(ledger_csv().as_bytes()).unwrap())
        .unwrap();
    engine
        .load_statement(&read_rows_csv(statement_csv().as_bytes()).unwrap())
        .unwrap();
    engine.set_tolerances(ToleranceConfig::default()).unwrap();
    let run = engine.execute().await.unwrap();

    // The run was written to the primary and mirrored locally
    assert!(remote_handle.get_run(run.id).await.unwrap().is_some());
    assert!(local_handle.get_run(run.id).await.unwrap().is_some());

    // Even with the remote copy gone, history still resolves
    remote_handle.clear();
    assert!(engine.get_run(run.id).await.unwrap().is_some());
}

#[test]
fn test_spec_scenarios_from_matcher_boundary() {
    use chrono::NaiveDate;
    use reconciliation_core::{Entry, EntrySide};

    let entry = |side, row, y, m, d, amount| {
        Entry::new(
            side,
            row,
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            amount,
            String::new(),
        )
    };

    // Amount exactly at tolerance matches; one unit past it does not
    let ledger = vec![entry(EntrySide::Ledger, 1, 2024, 3, 1, 100_000)];
    let statement = vec![entry(EntrySide::Statement, 1, 2024, 3, 1, 120_000)];

    let at_boundary = ToleranceConfig {
        max_date_delta_days: 30,
        max_amount_delta_minor: 20_000,
    };
    assert_eq!(match_entries(&ledger, &statement, &at_boundary).len(), 1);

    let past_boundary = ToleranceConfig {
        max_date_delta_days: 30,
        max_amount_delta_minor: 19_999,
    };
    let report = reconciliation_core::build_report(
        &ledger,
        &statement,
        match_entries(&ledger, &statement, &past_boundary),
    );
    assert!(report.matched.is_empty());
    assert_eq!(report.unmatched_ledger.len(), 1);
    assert_eq!(report.unmatched_statement.len(), 1);
}
