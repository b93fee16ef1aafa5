//! Output writers for the statistics report and the CSV export.
//!
//! This module handles:
//! - Rendering the console report from a statistics snapshot
//! - Writing the flattened transaction history as CSV

pub mod csv;
pub mod report;

// Re-export main functions
pub use self::csv::{format_timestamp, write_csv, write_transactions, CSV_HEADERS};
pub use report::render_report;
