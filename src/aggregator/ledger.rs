//! Per-signer running aggregates and the owner-set snapshot.
//!
//! The ledger keys signers by their lowercased address; the first casing
//! seen is kept for display. Classification against the owner set is a
//! grouping dimension only - totals accumulate for every address observed.

use crate::service::types::SafeInfo;
use crate::utils::address::normalize_address;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Classification of a signer relative to the Safe's owner set at run start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerClass {
    CurrentOwner,
    HistoricalSigner,
}

impl fmt::Display for SignerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerClass::CurrentOwner => write!(f, "current owner"),
            SignerClass::HistoricalSigner => write!(f, "historical signer"),
        }
    }
}

/// Immutable snapshot of the Safe's owner list, taken once per run.
///
/// Classification answers "is this signer still on the Safe today", not
/// "were they authorized at the time" - a signer removed since their last
/// execution classifies as historical.
#[derive(Debug, Clone)]
pub struct OwnerSet {
    safe_address: String,
    threshold: u32,
    version: Option<String>,
    owners_display: Vec<String>,
    owners: HashSet<String>,
}

impl OwnerSet {
    pub fn new(
        safe_address: impl Into<String>,
        threshold: u32,
        version: Option<String>,
        owners: Vec<String>,
    ) -> Self {
        let owner_keys = owners.iter().map(|o| normalize_address(o)).collect();
        Self {
            safe_address: safe_address.into(),
            threshold,
            version,
            owners_display: owners,
            owners: owner_keys,
        }
    }

    pub fn from_safe_info(info: &SafeInfo) -> Self {
        Self::new(
            info.address.clone(),
            info.threshold,
            info.version.clone(),
            info.owners.clone(),
        )
    }

    pub fn safe_address(&self) -> &str {
        &self.safe_address
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Owner addresses in service order, display casing
    pub fn owners(&self) -> &[String] {
        &self.owners_display
    }

    pub fn contains(&self, address: &str) -> bool {
        self.owners.contains(&normalize_address(address))
    }

    pub fn classify(&self, address: &str) -> SignerClass {
        if self.contains(address) {
            SignerClass::CurrentOwner
        } else {
            SignerClass::HistoricalSigner
        }
    }
}

/// Running aggregate for one signer address
#[derive(Debug, Clone, Default)]
pub struct SignerStats {
    /// Display form of the address (first casing seen)
    pub display_address: String,

    /// Transactions this signer proposed
    pub proposals: u64,

    /// Transactions this signer confirmed (deduplicated upstream)
    pub confirmations: u64,

    /// Transactions this signer executed
    pub executions: u64,

    /// Total gas paid as executor, ETH-equivalent
    pub gas_paid_eth: f64,

    /// Executions that contributed to `gas_paid_eth` (gas data available)
    pub gas_samples: u64,

    time_to_execution_mins: Vec<f64>,
}

impl SignerStats {
    /// Mean time-to-execution over this signer's executions, minutes
    pub fn mean_time_to_execution(&self) -> Option<f64> {
        if self.time_to_execution_mins.is_empty() {
            return None;
        }
        let sum: f64 = self.time_to_execution_mins.iter().sum();
        Some(sum / self.time_to_execution_mins.len() as f64)
    }

    /// Time-to-execution samples recorded for this signer
    pub fn time_to_execution_samples(&self) -> &[f64] {
        &self.time_to_execution_mins
    }
}

/// Mapping from signer address to running aggregates.
///
/// Built once per run by the statistics fold; never persisted.
#[derive(Debug, Default)]
pub struct SignerLedger {
    signers: HashMap<String, SignerStats>,
}

impl SignerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_proposal(&mut self, signer: &str) {
        self.entry(signer).proposals += 1;
    }

    pub fn record_confirmation(&mut self, signer: &str) {
        self.entry(signer).confirmations += 1;
    }

    pub fn record_execution(
        &mut self,
        signer: &str,
        fee_eth: Option<f64>,
        time_to_execution_mins: Option<f64>,
    ) {
        let stats = self.entry(signer);
        stats.executions += 1;
        if let Some(fee) = fee_eth {
            stats.gas_paid_eth += fee;
            stats.gas_samples += 1;
        }
        if let Some(minutes) = time_to_execution_mins {
            stats.time_to_execution_mins.push(minutes);
        }
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Signers sorted by address for deterministic output
    pub fn iter_sorted(&self) -> Vec<&SignerStats> {
        let mut entries: Vec<(&String, &SignerStats)> = self.signers.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, stats)| stats).collect()
    }

    fn entry(&mut self, signer: &str) -> &mut SignerStats {
        let key = normalize_address(signer);
        self.signers.entry(key).or_insert_with(|| SignerStats {
            display_address: signer.to_string(),
            ..SignerStats::default()
        })
    }
}
