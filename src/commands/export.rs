//! Export command implementation.
//!
//! The export command:
//! 1. Fetches the full transaction history
//! 2. Normalizes and optionally enriches each record
//! 3. Writes one CSV row per transaction
//! 4. Prints a one-line summary of rows and known fees

use super::run::{run_analysis, AnalysisOptions};
use crate::output::write_transactions;
use crate::utils::address::normalize_address;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the export command
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub options: AnalysisOptions,

    /// Output CSV path; defaults to `safe-<address>-tx.csv`
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    /// Resolve the output path, deriving the default from the Safe address
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "safe-{}-tx.csv",
                normalize_address(&self.options.safe_address)
            ))
        })
    }
}

/// Execute the export command
///
/// **Public** - main entry point called from main.rs
pub fn execute_export(args: ExportArgs) -> Result<()> {
    let start_time = Instant::now();

    let outcome = run_analysis(&args.options)?;
    let output_path = args.output_path();

    write_transactions(&outcome.transactions, &output_path)
        .context("Failed to write CSV export")?;

    let snapshot = &outcome.snapshot;
    println!(
        "✓ wrote {} rows → {}   known fees ≈ {:.4} ETH ({} of {} executed)",
        outcome.transactions.len(),
        output_path.display(),
        snapshot.total_fees_eth,
        snapshot.executed_with_gas,
        snapshot.executed_transactions,
    );

    info!(
        "Export completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
