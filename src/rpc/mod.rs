//! Ethereum JSON-RPC client used for optional gas enrichment.

pub mod client;
pub mod types;

// Re-export main types
pub use client::EthRpcClient;
