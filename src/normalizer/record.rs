//! Conversion of raw service records into canonical transactions.
//!
//! Normalization is pure and per-record: no state is carried between calls.
//! Only an undecodable record or one missing its safe-transaction hash or
//! nonce is rejected; every other absent field degrades to an unset option.

use super::schema::{CallSelector, CanonicalTransaction, Confirmation};
use crate::service::types::RawMultisigTransaction;
use crate::utils::address::short;
use crate::utils::error::NormalizeError;
use crate::utils::units::{parse_wei, round_dp, wei_to_eth, wei_to_gwei};
use chrono::{DateTime, Utc};
use log::warn;

/// Normalize one raw record into a canonical transaction.
///
/// # Errors
/// * `NormalizeError::JsonError` - the record is not a transaction object
/// * `NormalizeError::MissingField` - no parsable `safeTxHash` or `nonce`
pub fn normalize_record(
    raw: &serde_json::Value,
) -> Result<CanonicalTransaction, NormalizeError> {
    let record: RawMultisigTransaction = serde_json::from_value(raw.clone())?;

    let safe_tx_hash = record
        .safe_tx_hash
        .filter(|h| !h.is_empty())
        .ok_or(NormalizeError::MissingField("safeTxHash"))?;
    let nonce = record.nonce.ok_or(NormalizeError::MissingField("nonce"))?;

    let submission_time = parse_timestamp(&safe_tx_hash, record.submission_date.as_deref());
    let execution_time = parse_timestamp(&safe_tx_hash, record.execution_date.as_deref());

    let (selector, payload_length) = CallSelector::from_call_data(record.data.as_deref());
    if selector.is_malformed() {
        warn!(
            "{} call data of {} byte(s) cannot carry a selector",
            short(&safe_tx_hash),
            payload_length
        );
    }

    let value_eth = record
        .value
        .as_deref()
        .and_then(parse_wei)
        .map(wei_to_eth)
        .unwrap_or(0.0);

    let gas_price_gwei = record
        .eth_gas_price
        .as_deref()
        .and_then(parse_wei)
        .map(|wei| round_dp(wei_to_gwei(wei), 3));
    let gas_used = record.gas_used;
    let fee_eth = record
        .fee
        .as_deref()
        .and_then(parse_wei)
        .map(|wei| round_dp(wei_to_eth(wei), 6))
        .or_else(|| match (gas_price_gwei, gas_used) {
            (Some(price), Some(used)) => Some(round_dp(used as f64 * price * 1e-9, 6)),
            _ => None,
        });

    let confirmations = record
        .confirmations
        .unwrap_or_default()
        .into_iter()
        .filter_map(|c| match c.owner {
            Some(owner) => Some(Confirmation {
                confirmed_at: parse_timestamp(&safe_tx_hash, c.submission_date.as_deref()),
                owner,
            }),
            None => {
                warn!("{} confirmation entry without owner", short(&safe_tx_hash));
                None
            }
        })
        .collect();

    Ok(CanonicalTransaction {
        safe_tx_hash,
        transaction_hash: record.transaction_hash.filter(|h| !h.is_empty()),
        nonce,
        block_number: record.block_number,
        submission_time,
        execution_time,
        proposer: record.proposer.filter(|p| !p.is_empty()),
        executor: record.executor.filter(|e| !e.is_empty()),
        to: record.to,
        value_eth,
        operation: record.operation.unwrap_or(0),
        safe_tx_gas: record.safe_tx_gas.unwrap_or(0),
        decoded_method: record.data_decoded.and_then(|d| d.method),
        selector,
        payload_length,
        confirmations,
        is_successful: record.is_successful,
        gas_price_gwei,
        gas_used,
        fee_eth,
    })
}

/// Parse an ISO-8601 timestamp; unparsable values degrade to unset
fn parse_timestamp(safe_tx_hash: &str, value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(err) => {
            warn!(
                "{} unparsable timestamp {:?}: {}",
                short(safe_tx_hash),
                value,
                err
            );
            None
        }
    }
}
