//! Types for JSON-RPC communication with an Ethereum node.
//!
//! Based on the Ethereum JSON-RPC spec; only the fields needed for gas
//! enrichment are modelled, the rest of each payload is ignored.

use serde::Deserialize;

/// JSON-RPC 2.0 response structure
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct JsonRpcResponse<T> {
    pub jsonrpc: String,

    pub id: u64,

    #[serde(default)]
    pub result: Option<T>,

    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Subset of `eth_getTransactionByHash` we care about
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    /// Gas price as a hex quantity in wei
    #[serde(default)]
    pub gas_price: Option<String>,
}

/// Subset of `eth_getTransactionReceipt` we care about
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    /// Gas used as a hex quantity
    #[serde(default)]
    pub gas_used: Option<String>,

    /// Effective gas price (EIP-1559), preferred over the transaction's
    /// gas price when present
    #[serde(default)]
    pub effective_gas_price: Option<String>,
}
