//! Aggregation of the transaction stream into signer statistics.
//!
//! This module transforms the normalized, optionally enriched stream into:
//! - Per-signer participation and gas aggregates (signer ledger)
//! - The global time-to-execution distribution
//! - Run-level data-quality counters

pub mod ledger;
pub mod stats;

// Re-export main types and functions
pub use ledger::{OwnerSet, SignerClass, SignerLedger, SignerStats};
pub use stats::{Aggregator, RunCounters, SignerRow, StatisticsSnapshot, SummaryStats};
