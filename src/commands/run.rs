//! Shared analysis pipeline.
//!
//! Both commands run the same synchronous pull pipeline: pages are consumed
//! lazily and each record flows normalizer -> merger -> aggregator before
//! the next page is requested. The owner snapshot is fetched once up front
//! and passed into the aggregator by value.

use crate::aggregator::{Aggregator, OwnerSet, StatisticsSnapshot};
use crate::enrich::enrich_transaction;
use crate::normalizer::normalize_record;
use crate::normalizer::schema::CanonicalTransaction;
use crate::rpc::EthRpcClient;
use crate::service::ServiceClient;
use crate::utils::address::{is_valid_address, normalize_address};
use anyhow::{Context, Result};
use log::{debug, info, warn};

/// Connection and filtering options shared by all commands
///
/// **Public** - constructed by main.rs from CLI args
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Safe address to analyze (any casing)
    pub safe_address: String,

    /// Base URL of the Safe transaction service
    pub service_url: String,

    /// JSON-RPC endpoint; presence enables gas enrichment
    pub rpc_url: Option<String>,

    /// Ignore records executed before this block
    pub from_block: Option<u64>,
}

/// Everything a run produces: the ordered enriched transactions for the
/// CSV export and the final snapshot for the report
pub struct AnalysisOutcome {
    pub transactions: Vec<CanonicalTransaction>,
    pub snapshot: StatisticsSnapshot,
}

/// Validate analysis options
///
/// **Public** - called before run_analysis for early validation
pub fn validate_options(options: &AnalysisOptions) -> Result<()> {
    if !is_valid_address(&options.safe_address) {
        anyhow::bail!(
            "Safe address must be 20 bytes (40 hex characters): {}",
            options.safe_address
        );
    }

    if options.service_url.is_empty() {
        anyhow::bail!("service URL cannot be empty");
    }

    if !options.service_url.starts_with("http://") && !options.service_url.starts_with("https://") {
        anyhow::bail!("service URL must start with http:// or https://");
    }

    if let Some(rpc_url) = &options.rpc_url {
        if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
            anyhow::bail!("RPC URL must start with http:// or https://");
        }
    }

    Ok(())
}

/// Execute the full analysis pipeline
///
/// # Errors
/// * Service unreachable or un-paginatable history (fatal)
/// * RPC client construction failure when enrichment is requested
///
/// Record-level problems (undecodable records, failed enrichment lookups)
/// are counted in the snapshot instead of failing the run.
pub fn run_analysis(options: &AnalysisOptions) -> Result<AnalysisOutcome> {
    let safe_address = normalize_address(&options.safe_address);

    info!("Analyzing Safe {}", safe_address);
    info!("Transaction service: {}", options.service_url);

    let service =
        ServiceClient::new(&options.service_url).context("Failed to create service client")?;

    let safe_info = service
        .safe_info(&safe_address)
        .context("Unable to retrieve Safe info")?;
    let owner_set = OwnerSet::from_safe_info(&safe_info);
    info!(
        "Safe has {} owner(s), threshold {}",
        owner_set.owners().len(),
        owner_set.threshold()
    );

    let lookup = match &options.rpc_url {
        Some(rpc_url) => {
            info!("Gas enrichment enabled via {}", rpc_url);
            Some(EthRpcClient::new(rpc_url.clone()).context("Failed to create RPC client")?)
        }
        None => None,
    };

    let mut aggregator = Aggregator::new(owner_set, lookup.is_some());
    let mut transactions = Vec::new();

    for record in service.multisig_transactions(&safe_address) {
        let raw = record.context("Unable to retrieve transaction history")?;

        let mut tx = match normalize_record(&raw) {
            Ok(tx) => tx,
            Err(err) => {
                warn!("skipping record: {}", err);
                aggregator.record_skip();
                continue;
            }
        };

        // records without a block number (unexecuted) pass the filter
        if let (Some(from_block), Some(block)) = (options.from_block, tx.block_number) {
            if block < from_block {
                debug!("{} below block {}, filtered", tx.safe_tx_hash, from_block);
                continue;
            }
        }

        if let Some(lookup) = &lookup {
            let outcome = enrich_transaction(&mut tx, lookup);
            aggregator.record_enrichment(&outcome);
        }

        aggregator.observe(&tx);
        transactions.push(tx);
    }

    info!("Processed {} transaction(s)", transactions.len());

    Ok(AnalysisOutcome {
        transactions,
        snapshot: aggregator.finish(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> AnalysisOptions {
        AnalysisOptions {
            safe_address: "0x5afe000000000000000000000000000000000001".to_string(),
            service_url: "https://safe-transaction-mainnet.safe.global".to_string(),
            rpc_url: None,
            from_block: None,
        }
    }

    #[test]
    fn test_validate_options_valid() {
        assert!(validate_options(&options()).is_ok());
    }

    #[test]
    fn test_validate_options_short_address() {
        let mut opts = options();
        opts.safe_address = "0x5afe".to_string();
        assert!(validate_options(&opts).is_err());
    }

    #[test]
    fn test_validate_options_invalid_hex_address() {
        let mut opts = options();
        opts.safe_address = "0xzzzz000000000000000000000000000000000001".to_string();
        assert!(validate_options(&opts).is_err());
    }

    #[test]
    fn test_validate_options_bad_service_scheme() {
        let mut opts = options();
        opts.service_url = "ftp://example.org".to_string();
        assert!(validate_options(&opts).is_err());
    }

    #[test]
    fn test_validate_options_bad_rpc_scheme() {
        let mut opts = options();
        opts.rpc_url = Some("localhost:8545".to_string());
        assert!(validate_options(&opts).is_err());
    }

    #[test]
    fn test_validate_options_address_without_prefix() {
        let mut opts = options();
        opts.safe_address = "5afe000000000000000000000000000000000001".to_string();
        assert!(validate_options(&opts).is_ok());
    }
}
