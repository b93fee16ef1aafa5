//! Report command implementation.
//!
//! The report command:
//! 1. Fetches the Safe overview and full transaction history
//! 2. Normalizes, optionally enriches, and folds the stream
//! 3. Prints the statistics report to stdout
//! 4. Optionally writes the CSV export alongside

use super::run::{run_analysis, AnalysisOptions};
use crate::output::{render_report, write_transactions};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the report command
#[derive(Debug, Clone)]
pub struct ReportArgs {
    pub options: AnalysisOptions,

    /// Also write the CSV export to this path
    pub csv_output: Option<PathBuf>,
}

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let start_time = Instant::now();

    let outcome = run_analysis(&args.options)?;

    println!("{}", render_report(&outcome.snapshot));

    if let Some(csv_path) = &args.csv_output {
        write_transactions(&outcome.transactions, csv_path)
            .context("Failed to write CSV export")?;
        info!("✓ CSV written to: {}", csv_path.display());
    }

    info!(
        "Report completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
