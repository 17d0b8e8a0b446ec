//! Basic reconciliation usage example

use reconciliation_core::utils::MemoryRunStore;
use reconciliation_core::{
    format_amount_minor, RawRow, ReconciliationEngine, RunQuery, StatementKind, ToleranceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏦 Reconciliation Core - Basic Example\n");

    let mut engine = ReconciliationEngine::new(MemoryRunStore::new());

    // 1. Choose what is being reconciled
    engine.select_kind(StatementKind::BankAccount)?;
    println!("📋 Reconciling a bank account statement\n");

    // 2. Load both sides (rows as the spreadsheet codec hands them over)
    let ledger_rows = vec![
        RawRow::new(1, "01/03/2024", "1.500,00", "Invoice 1001 - Acme"),
        RawRow::new(2, "05/03/2024", "-400,00", "Supplier payment"),
        RawRow::new(3, "18/03/2024", "2.350,75", "Invoice 1002 - Globex"),
    ];
    let statement_rows = vec![
        RawRow::new(1, "03/03/2024", "1.500,00", "TRANSFER RECEIVED"),
        RawRow::new(2, "06/03/2024", "-400,00", "WIRE OUT"),
        RawRow::new(3, "25/03/2024", "-12,50", "ACCOUNT FEE"),
    ];

    let ledger_count = engine.load_ledger(&ledger_rows)?;
    let statement_count = engine.load_statement(&statement_rows)?;
    println!("  ✓ Loaded {ledger_count} ledger entries and {statement_count} statement entries");

    // 3. Tolerances: up to 30 days apart, amounts up to 200.00 apart
    engine.set_tolerances(ToleranceConfig::default())?;

    // 4. Execute and inspect the report
    let run = engine.execute().await?;
    let report = &run.report;

    println!("\n💡 Results:");
    for m in &report.matched {
        println!(
            "  ✓ {} ↔ {} ({} days apart, amount delta {})",
            m.ledger.description,
            m.statement.description,
            m.date_delta_days,
            format_amount_minor(m.amount_delta_minor),
        );
    }
    for e in &report.unmatched_ledger {
        println!("  ? ledger only: {} ({})", e.description, format_amount_minor(e.amount_minor));
    }
    for e in &report.unmatched_statement {
        println!(
            "  ? statement only: {} ({})",
            e.description,
            format_amount_minor(e.amount_minor)
        );
    }

    println!(
        "\n  Totals: ledger {} | statement {} | difference {}",
        format_amount_minor(report.total_ledger),
        format_amount_minor(report.total_statement),
        format_amount_minor(report.difference),
    );

    // 5. The run is persisted and queryable
    let history = engine.history(&RunQuery::default()).await?;
    println!("\n🗂  {} run(s) in history, latest id {}", history.len(), history[0].id);

    Ok(())
}
