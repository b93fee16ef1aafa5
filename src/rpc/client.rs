//! HTTP client for gas enrichment over Ethereum JSON-RPC.

use super::types::{JsonRpcError, JsonRpcResponse, RpcReceipt, RpcTransaction};
use crate::enrich::{GasInfo, GasLookup};
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::RpcError;
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

/// Blocking JSON-RPC client used for per-transaction gas lookups
pub struct EthRpcClient {
    client: Client,
    rpc_url: String,
}

impl EthRpcClient {
    /// Create a new RPC client
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(RpcError::RequestFailed)?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
        })
    }

    /// Issue one JSON-RPC call and unwrap the result field.
    ///
    /// A `null` result deserializes to `None` (transaction unknown to the
    /// node), which the caller maps to a non-fatal miss.
    fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        tx_hash: &str,
    ) -> Result<Option<T>, RpcError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": [tx_hash],
            "id": 1
        });

        debug!("RPC request: {} {}", method, tx_hash);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .map_err(RpcError::RequestFailed)?;

        if !response.status().is_success() {
            return Err(RpcError::InvalidResponse(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        let rpc_response: JsonRpcResponse<T> = response
            .json()
            .map_err(RpcError::RequestFailed)?;

        if let Some(error) = rpc_response.error {
            return Err(map_rpc_error(error, tx_hash));
        }

        Ok(rpc_response.result)
    }
}

impl GasLookup for EthRpcClient {
    fn fetch_gas_info(&self, tx_hash: &str) -> Result<Option<GasInfo>, RpcError> {
        let tx_hash = normalize_tx_hash(tx_hash);

        let Some(transaction) = self.call::<RpcTransaction>("eth_getTransactionByHash", &tx_hash)?
        else {
            return Ok(None);
        };

        let Some(receipt) = self.call::<RpcReceipt>("eth_getTransactionReceipt", &tx_hash)? else {
            return Ok(None);
        };

        // Post-London receipts carry the effective price actually paid
        let price_hex = receipt
            .effective_gas_price
            .or(transaction.gas_price)
            .ok_or_else(|| {
                RpcError::InvalidResponse("transaction has no gas price field".to_string())
            })?;

        let gas_used_hex = receipt
            .gas_used
            .ok_or_else(|| RpcError::InvalidResponse("receipt has no gasUsed field".to_string()))?;

        Ok(Some(GasInfo {
            gas_price_wei: parse_hex_quantity(&price_hex)?,
            gas_used: parse_hex_quantity(&gas_used_hex)? as u64,
        }))
    }
}

/// Normalize transaction hash to include 0x prefix
fn normalize_tx_hash(tx_hash: &str) -> String {
    if tx_hash.starts_with("0x") {
        tx_hash.to_string()
    } else {
        format!("0x{}", tx_hash)
    }
}

/// Parse a JSON-RPC hex quantity ("0x5208") or plain decimal string
fn parse_hex_quantity(value: &str) -> Result<u128, RpcError> {
    if let Some(hex) = value.strip_prefix("0x") {
        u128::from_str_radix(hex, 16)
            .map_err(|e| RpcError::InvalidResponse(format!("invalid hex quantity: {}", e)))
    } else {
        value
            .parse::<u128>()
            .map_err(|e| RpcError::InvalidResponse(format!("invalid decimal quantity: {}", e)))
    }
}

/// Map JSON-RPC error to our error type
fn map_rpc_error(error: JsonRpcError, tx_hash: &str) -> RpcError {
    if error.code == -32000 && error.message.to_lowercase().contains("not found") {
        RpcError::TransactionNotFound(tx_hash.to_string())
    } else {
        RpcError::InvalidResponse(format!("{}: {}", error.code, error.message))
    }
}
