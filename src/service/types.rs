//! Types for the Safe transaction service REST API.
//!
//! Records are kept as raw `serde_json::Value` at the page level so a single
//! malformed record can be skipped without rejecting the whole page. The
//! normalizer attempts the typed decode per record.

use serde::Deserialize;

/// One page of a cursor-paginated service listing
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub count: Option<u64>,

    /// URL of the next page, absent on the last page
    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub previous: Option<String>,

    /// Raw records; a page without this array cannot be paginated
    pub results: Vec<serde_json::Value>,
}

/// Safe overview as returned by `/api/v1/safes/{address}/`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeInfo {
    pub address: String,

    #[serde(default)]
    pub nonce: Option<u64>,

    pub threshold: u32,

    pub owners: Vec<String>,

    #[serde(default)]
    pub version: Option<String>,
}

/// Typed view of one multisig transaction record.
///
/// Every field is optional: the service omits execution fields for
/// unexecuted transactions and older records miss fields newer ones carry.
/// The normalizer decides which absences reject a record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMultisigTransaction {
    #[serde(default)]
    pub safe_tx_hash: Option<String>,

    /// On-chain transaction hash, present once executed
    #[serde(default)]
    pub transaction_hash: Option<String>,

    #[serde(default)]
    pub nonce: Option<u64>,

    #[serde(default)]
    pub block_number: Option<u64>,

    #[serde(default)]
    pub submission_date: Option<String>,

    #[serde(default)]
    pub execution_date: Option<String>,

    #[serde(default)]
    pub proposer: Option<String>,

    #[serde(default)]
    pub executor: Option<String>,

    #[serde(default)]
    pub to: Option<String>,

    /// Transfer value in wei, as a decimal string
    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub operation: Option<u8>,

    #[serde(default)]
    pub safe_tx_gas: Option<u64>,

    /// Call data as a 0x-prefixed hex string, null for plain transfers
    #[serde(default)]
    pub data: Option<String>,

    #[serde(default)]
    pub data_decoded: Option<DataDecoded>,

    #[serde(default)]
    pub confirmations: Option<Vec<RawConfirmation>>,

    #[serde(default)]
    pub is_executed: Option<bool>,

    #[serde(default)]
    pub is_successful: Option<bool>,

    #[serde(default)]
    pub gas_used: Option<u64>,

    /// Effective gas price in wei, as a decimal string
    #[serde(default)]
    pub eth_gas_price: Option<String>,

    /// Total execution fee in wei, as a decimal string
    #[serde(default)]
    pub fee: Option<String>,
}

/// Service-side decoding of the call data (method name only)
#[derive(Debug, Clone, Deserialize)]
pub struct DataDecoded {
    #[serde(default)]
    pub method: Option<String>,
}

/// One confirmation entry on a multisig transaction
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfirmation {
    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub submission_date: Option<String>,
}
