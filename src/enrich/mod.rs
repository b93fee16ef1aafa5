//! Optional on-chain gas enrichment of normalized transactions.

pub mod merger;

// Re-export main types
pub use merger::{enrich_transaction, EnrichOutcome, GasInfo, GasLookup};
