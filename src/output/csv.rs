//! CSV export of the transaction history.
//!
//! One row per transaction, in stream order. Unset optional fields render
//! as empty cells so "unknown" stays distinguishable from zero. All
//! timestamps share one format.

use crate::normalizer::schema::CanonicalTransaction;
use crate::utils::config::TIMESTAMP_FORMAT;
use crate::utils::error::OutputError;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column headers, aligned with the row layout of `record_fields`
pub const CSV_HEADERS: &[&str] = &[
    "block",
    "nonce",
    "submission",
    "execution",
    "proposer",
    "executor",
    "to",
    "value_eth",
    "operation",
    "safe_tx_gas",
    "selector",
    "payload_length",
    "decoded",
    "success",
    "tx_hash",
    "safe_tx_hash",
    "gas_price_gwei",
    "gas_used",
    "fee_eth",
];

/// Write the transaction history to a CSV file
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path or path is a directory
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::CsvFailed` - CSV serialization error
pub fn write_transactions(
    transactions: &[CanonicalTransaction],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} rows to: {}", transactions.len(), output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    write_csv(transactions, BufWriter::new(file))
}

/// Write the transaction history to any writer (used directly by tests)
pub fn write_csv<W: Write>(
    transactions: &[CanonicalTransaction],
    writer: W,
) -> Result<(), OutputError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_HEADERS)?;
    for tx in transactions {
        csv_writer.write_record(record_fields(tx))?;
    }

    csv_writer.flush().map_err(OutputError::WriteFailed)?;
    Ok(())
}

/// Render one transaction as CSV cells
fn record_fields(tx: &CanonicalTransaction) -> Vec<String> {
    vec![
        opt_display(tx.block_number),
        tx.nonce.to_string(),
        opt_timestamp(tx.submission_time),
        opt_timestamp(tx.execution_time),
        tx.proposer.clone().unwrap_or_default(),
        tx.executor.clone().unwrap_or_default(),
        tx.to.clone().unwrap_or_default(),
        format_eth(tx.value_eth),
        tx.operation.to_string(),
        tx.safe_tx_gas.to_string(),
        tx.selector.to_string(),
        tx.payload_length.to_string(),
        tx.decoded_method.clone().unwrap_or_default(),
        tx.is_successful.map(|s| s.to_string()).unwrap_or_default(),
        tx.transaction_hash.clone().unwrap_or_default(),
        tx.safe_tx_hash.clone(),
        tx.gas_price_gwei.map(|p| format!("{:.3}", p)).unwrap_or_default(),
        opt_display(tx.gas_used),
        tx.fee_eth.map(|f| format!("{:.6}", f)).unwrap_or_default(),
    ]
}

/// Format a timestamp with the shared format, empty when unset
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    opt_timestamp(timestamp)
}

fn opt_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn opt_display<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn format_eth(value: f64) -> String {
    format!("{:.6}", value)
}

/// Validate that output path is writable
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
