//! Canonical transaction representation.
//!
//! One `CanonicalTransaction` per raw service record, uniquely identified by
//! its safe-transaction hash. Optional fields stay unset when the service
//! omitted them; "zero" and "unknown" are never conflated.

use chrono::{DateTime, Utc};
use std::fmt;

/// Decoded 4-byte function selector of the call data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSelector {
    /// No call data: plain ETH transfer
    EthTransfer,

    /// Call data of 1-3 bytes: cannot carry a selector, recorded as anomaly
    Malformed,

    /// First 4 bytes of the call data, rendered as `func <8 hex chars>`
    Function(String),
}

impl CallSelector {
    /// Extract selector and payload byte length from a 0x-prefixed hex
    /// call-data string.
    ///
    /// Payload bytes beyond the selector are treated as opaque length-only
    /// data. Non-hex or odd-length strings count as malformed too.
    pub fn from_call_data(data: Option<&str>) -> (Self, usize) {
        let hex = match data {
            Some(d) => d.strip_prefix("0x").unwrap_or(d),
            None => return (CallSelector::EthTransfer, 0),
        };

        if hex.is_empty() {
            return (CallSelector::EthTransfer, 0);
        }

        let payload_length = hex.len() / 2;

        if hex.len() % 2 != 0 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return (CallSelector::Malformed, payload_length);
        }

        if payload_length < 4 {
            return (CallSelector::Malformed, payload_length);
        }

        let selector = format!("func {}", hex[..8].to_ascii_lowercase());
        (CallSelector::Function(selector), payload_length)
    }

    /// Whether this selector records a call-data anomaly
    pub fn is_malformed(&self) -> bool {
        matches!(self, CallSelector::Malformed)
    }
}

impl fmt::Display for CallSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Empty marker: ETH transfer / no usable selector
            CallSelector::EthTransfer | CallSelector::Malformed => Ok(()),
            CallSelector::Function(s) => write!(f, "{}", s),
        }
    }
}

/// One confirmation (signer approval) on a transaction, in confirmation order
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub owner: String,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Normalized view of one multisig transaction
#[derive(Debug, Clone)]
pub struct CanonicalTransaction {
    /// Safe-transaction hash, the unique identity of the record
    pub safe_tx_hash: String,

    /// On-chain transaction hash, present iff executed
    pub transaction_hash: Option<String>,

    pub nonce: u64,

    pub block_number: Option<u64>,

    pub submission_time: Option<DateTime<Utc>>,

    /// Present iff the transaction was executed
    pub execution_time: Option<DateTime<Utc>>,

    /// Signer that created the proposal; absent on legacy records
    pub proposer: Option<String>,

    /// Address that submitted the execution, present iff executed
    pub executor: Option<String>,

    pub to: Option<String>,

    pub value_eth: f64,

    pub operation: u8,

    pub safe_tx_gas: u64,

    /// Method name decoded by the service, when available
    pub decoded_method: Option<String>,

    pub selector: CallSelector,

    /// Call data byte length (0 if none)
    pub payload_length: usize,

    pub confirmations: Vec<Confirmation>,

    pub is_successful: Option<bool>,

    /// Unset until provided by the raw record or enrichment
    pub gas_price_gwei: Option<f64>,

    /// Unset until provided by the raw record or enrichment
    pub gas_used: Option<u64>,

    /// Unset until provided by the raw record or enrichment
    pub fee_eth: Option<f64>,
}

impl CanonicalTransaction {
    /// Whether this transaction was executed on chain
    pub fn is_executed(&self) -> bool {
        self.executor.is_some() || self.execution_time.is_some()
    }
}
