//! Console report renderer.
//!
//! Renders a `StatisticsSnapshot` to a string so the layout is testable;
//! the report command prints it verbatim. Gas values are ETH-equivalent and
//! partial coverage is always stated explicitly, never implied.

use crate::aggregator::stats::{SignerRow, StatisticsSnapshot};
use crate::output::csv::format_timestamp;
use std::fmt::Write;

const BANNER_WIDTH: usize = 55;

/// Render the full console report
pub fn render_report(snapshot: &StatisticsSnapshot) -> String {
    let mut out = String::new();
    let banner = "=".repeat(BANNER_WIDTH);

    let _ = writeln!(out, "{}", banner);
    let _ = writeln!(out, "Safe: {}", snapshot.safe_address);
    let _ = writeln!(out, "{}", banner);

    render_overview(&mut out, snapshot);
    render_transaction_info(&mut out, snapshot);
    render_signer_info(&mut out, snapshot);
    render_data_quality(&mut out, snapshot);

    out
}

fn render_overview(out: &mut String, snapshot: &StatisticsSnapshot) {
    let _ = writeln!(out, "\n** OVERVIEW **\n");
    let _ = writeln!(
        out,
        "Contract Version .............. {}",
        snapshot.version.as_deref().unwrap_or("unknown")
    );
    let _ = writeln!(out, "Threshold ..................... {}", snapshot.threshold);
    let _ = writeln!(out, "Signers ....................... {}", snapshot.owners.len());
    for owner in &snapshot.owners {
        let _ = writeln!(out, "\t{}", owner);
    }
}

fn render_transaction_info(out: &mut String, snapshot: &StatisticsSnapshot) {
    let _ = writeln!(out, "\n** TRANSACTION INFO **\n");
    let _ = writeln!(
        out,
        "Total Transactions ............ {}",
        snapshot.total_transactions
    );
    let _ = writeln!(
        out,
        "Executed Transactions ......... {}",
        snapshot.executed_transactions
    );

    if let (Some(oldest), Some(newest)) =
        (snapshot.oldest_submission, snapshot.newest_submission)
    {
        let _ = writeln!(
            out,
            "Oldest Submission ............. {}",
            format_timestamp(Some(oldest))
        );
        let _ = writeln!(
            out,
            "Newest Submission ............. {}",
            format_timestamp(Some(newest))
        );
    }

    let _ = writeln!(out, "\nTime to Execution");
    match &snapshot.execution_stats {
        Some(stats) => {
            let _ = writeln!(out, "\tMin ....................... {:.0} mins.", stats.min);
            let _ = writeln!(out, "\tMedian .................... {:.0} mins.", stats.median);
            let _ = writeln!(out, "\tMean ...................... {:.0} mins.", stats.mean);
            let _ = writeln!(out, "\tMax ....................... {:.0} mins.", stats.max);
            let _ = writeln!(out, "\tStdev ..................... {:.0} mins.", stats.stdev);
        }
        None => {
            let _ = writeln!(out, "\tno executed transactions with usable timestamps");
        }
    }

    let _ = writeln!(out, "\nGas Spend");
    let _ = writeln!(
        out,
        "\tTotal Fees ................ {:.4} ETH",
        snapshot.total_fees_eth
    );
    let partial_marker = if snapshot.gas_totals_are_partial() {
        " (partial)"
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "\tGas Data Available ........ {}/{} executed transactions{}",
        snapshot.executed_with_gas, snapshot.executed_transactions, partial_marker
    );
}

fn render_signer_info(out: &mut String, snapshot: &StatisticsSnapshot) {
    let _ = writeln!(out, "\n** SIGNER INFO **\n");

    if snapshot.signers.is_empty() {
        let _ = writeln!(out, "\tno signer activity observed");
        return;
    }

    for row in &snapshot.signers {
        render_signer_row(out, row, snapshot.executed_transactions);
    }
}

fn render_signer_row(out: &mut String, row: &SignerRow, executed: u64) {
    let _ = writeln!(out, "\tSigner: {} ({})", row.address, row.class);
    let _ = writeln!(
        out,
        "\t\tProposed .................. {} ({})",
        row.proposals,
        percentage(row.proposals, executed)
    );
    let _ = writeln!(
        out,
        "\t\tConfirmed ................. {} ({})",
        row.confirmations,
        percentage(row.confirmations, executed)
    );
    let _ = writeln!(
        out,
        "\t\tExecuted .................. {} ({})",
        row.executions,
        percentage(row.executions, executed)
    );
    if let Some(mean) = row.mean_time_to_execution_mins {
        let _ = writeln!(out, "\t\tMean Time to Execution .... {:.0} mins.", mean);
    }
    let gas_note = if row.gas_samples < row.executions {
        format!(" (over {} of {} executions)", row.gas_samples, row.executions)
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        "\t\tGas Spent ................. {:.4} ETH{}\n",
        row.gas_paid_eth, gas_note
    );
}

fn render_data_quality(out: &mut String, snapshot: &StatisticsSnapshot) {
    let counters = &snapshot.counters;

    let _ = writeln!(out, "** DATA QUALITY **\n");
    let _ = writeln!(
        out,
        "\tRecords Skipped ........... {}",
        counters.skipped_records
    );
    let _ = writeln!(
        out,
        "\tMalformed Call Data ....... {}",
        counters.malformed_call_data
    );
    let _ = writeln!(
        out,
        "\tNegative Durations ........ {}",
        counters.negative_durations
    );
    let _ = writeln!(
        out,
        "\tDuplicate Nonces .......... {}",
        counters.duplicate_nonces
    );
    let _ = writeln!(
        out,
        "\tDuplicate Confirmations ... {}",
        counters.duplicate_confirmations
    );
    if snapshot.enrichment_enabled {
        let _ = writeln!(
            out,
            "\tEnriched .................. {}/{} transactions",
            counters.enriched, counters.enrichment_attempts
        );
    } else {
        let _ = writeln!(out, "\tEnrichment ................ disabled");
    }
}

fn percentage(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "n/a".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / whole as f64)
}
