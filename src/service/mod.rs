//! Safe transaction service client.
//!
//! This module handles:
//! - Fetching the Safe overview (owners, threshold, version)
//! - Lazy cursor-paginated iteration over the multisig transaction history

pub mod client;
pub mod types;

// Re-export main types
pub use client::{ServiceClient, TransactionStream};
pub use types::{Page, RawConfirmation, RawMultisigTransaction, SafeInfo};
