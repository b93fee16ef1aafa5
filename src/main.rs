//! Safe Stats CLI
//!
//! Analyzes the multisig transaction history of a Safe wallet.
//! Produces signer/executor statistics and a CSV export of every
//! historical transaction, optionally enriched with on-chain gas data.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use safe_stats::commands::{
    execute_export, execute_report, validate_options, AnalysisOptions, ExportArgs, ReportArgs,
};
use safe_stats::utils::config::DEFAULT_SERVICE_URL;
use std::path::PathBuf;

/// Safe Stats - transaction history analytics for Safe multisig wallets
#[derive(Parser, Debug)]
#[command(name = "safe-stats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print signer/executor statistics for a Safe
    Report {
        /// Safe address (any checksum or lower-case form)
        #[arg(short, long)]
        safe: String,

        /// Safe transaction service base URL
        #[arg(long, env = "SAFE_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
        service: String,

        /// JSON-RPC endpoint; enables gas enrichment (slower)
        #[arg(short, long)]
        rpc: Option<String>,

        /// Ignore transactions executed before this block
        #[arg(long)]
        from_block: Option<u64>,

        /// Also write the CSV export to this path
        #[arg(short, long)]
        csv: Option<PathBuf>,
    },

    /// Export the full transaction history as CSV
    Export {
        /// Safe address (any checksum or lower-case form)
        #[arg(short, long)]
        safe: String,

        /// Safe transaction service base URL
        #[arg(long, env = "SAFE_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
        service: String,

        /// JSON-RPC endpoint; enables gas enrichment (slower)
        #[arg(short, long)]
        rpc: Option<String>,

        /// Ignore transactions executed before this block
        #[arg(long)]
        from_block: Option<u64>,

        /// Output CSV path (default: safe-<address>-tx.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            safe,
            service,
            rpc,
            from_block,
            csv,
        } => {
            let options = AnalysisOptions {
                safe_address: safe,
                service_url: service,
                rpc_url: rpc,
                from_block,
            };

            validate_options(&options)?;

            execute_report(ReportArgs {
                options,
                csv_output: csv,
            })?;
        }

        Commands::Export {
            safe,
            service,
            rpc,
            from_block,
            output,
        } => {
            let options = AnalysisOptions {
                safe_address: safe,
                service_url: service,
                rpc_url: rpc,
                from_block,
            };

            validate_options(&options)?;

            execute_export(ExportArgs { options, output })?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Safe Stats v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Transaction history analytics for Safe multisig wallets.");
}
