//! Additive gas enrichment of canonical transactions.
//!
//! Fields already carried by a transaction are never overwritten, so a
//! second pass with the same lookup is a no-op and fees cannot be counted
//! twice. Lookup failures degrade the single transaction, never the run.

use crate::normalizer::schema::CanonicalTransaction;
use crate::utils::address::short;
use crate::utils::error::RpcError;
use crate::utils::units::{round_dp, wei_to_gwei};
use log::{debug, warn};

/// On-chain gas data for one executed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasInfo {
    pub gas_price_wei: u128,
    pub gas_used: u64,
}

/// Capability to look up gas data by on-chain transaction hash
pub trait GasLookup {
    fn fetch_gas_info(&self, tx_hash: &str) -> Result<Option<GasInfo>, RpcError>;
}

/// Outcome of one enrichment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// Lookup succeeded and at least the missing fields were filled
    Enriched,

    /// The transaction already carried price, usage and fee
    AlreadyComplete,

    /// No on-chain hash to look up (transaction not executed)
    NotExecuted,

    /// Lookup failed or the node does not know the transaction
    Failed,
}

/// Merge on-chain gas data into a transaction.
///
/// Invariants:
/// - present fields are never overwritten
/// - `fee_eth = gas_used * gas_price_gwei * 1e-9`
/// - failures are reported through the outcome, never raised
pub fn enrich_transaction(
    tx: &mut CanonicalTransaction,
    lookup: &dyn GasLookup,
) -> EnrichOutcome {
    if tx.gas_price_gwei.is_some() && tx.gas_used.is_some() && tx.fee_eth.is_some() {
        debug!("{} already enriched", short(&tx.safe_tx_hash));
        return EnrichOutcome::AlreadyComplete;
    }

    let Some(tx_hash) = tx.transaction_hash.clone() else {
        return EnrichOutcome::NotExecuted;
    };

    match lookup.fetch_gas_info(&tx_hash) {
        Ok(Some(info)) => {
            if tx.gas_price_gwei.is_none() {
                tx.gas_price_gwei = Some(round_dp(wei_to_gwei(info.gas_price_wei), 3));
            }
            if tx.gas_used.is_none() {
                tx.gas_used = Some(info.gas_used);
            }
            if tx.fee_eth.is_none() {
                if let (Some(price), Some(used)) = (tx.gas_price_gwei, tx.gas_used) {
                    tx.fee_eth = Some(round_dp(used as f64 * price * 1e-9, 6));
                }
            }
            EnrichOutcome::Enriched
        }
        Ok(None) => {
            warn!("{} rpc-miss - transaction unknown to node", short(&tx_hash));
            EnrichOutcome::Failed
        }
        Err(err) => {
            warn!("{} rpc-miss - {}", short(&tx_hash), err);
            EnrichOutcome::Failed
        }
    }
}
