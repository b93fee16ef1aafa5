//! Safe Stats
//!
//! Transaction history statistics and CSV export for Safe
//! multisig wallets.
//!
//! This crate provides the core implementation for the
//! `safe-stats` CLI tool: it pages through the Safe transaction
//! service, normalizes each record, optionally enriches it with
//! on-chain gas data, and folds the stream into signer and
//! executor statistics.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install safe-stats
//! safe-stats --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod enrich;
pub mod normalizer;
pub mod output;
pub mod rpc;
pub mod service;
pub mod utils;
