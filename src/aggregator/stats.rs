//! Left-fold of the transaction stream into final statistics.
//!
//! The aggregator consumes the (optionally enriched) chronological stream
//! one transaction at a time and produces one immutable snapshot at
//! end-of-stream. It never re-sorts: chronological order is the upstream
//! source's contract.

use super::ledger::{OwnerSet, SignerClass, SignerLedger};
use crate::enrich::EnrichOutcome;
use crate::normalizer::schema::CanonicalTransaction;
use crate::utils::address::{normalize_address, short};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashSet;

/// Distribution summary over a set of samples (minutes)
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub stdev: f64,
}

impl SummaryStats {
    /// Compute min/max/mean/median/stdev; `None` for an empty sample set -
    /// an explicit no-data state, never a computed zero
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len();
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("samples are finite"));

        let min = sorted[0];
        let max = sorted[count - 1];
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        };
        // sample standard deviation; 0 for a single sample
        let stdev = if count > 1 {
            let variance = sorted
                .iter()
                .map(|s| (s - mean).powi(2))
                .sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            stdev,
        })
    }
}

/// Non-fatal data-quality counters accumulated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Raw records rejected by the normalizer
    pub skipped_records: u64,

    /// Call data of 1-3 bytes (selector impossible)
    pub malformed_call_data: u64,

    /// Executions whose timestamps ran backwards; excluded from the
    /// distribution
    pub negative_durations: u64,

    /// Transactions sharing a nonce with their predecessor
    /// (replaced/cancelled proposals)
    pub duplicate_nonces: u64,

    /// Confirmation entries dropped by per-transaction signer dedup
    pub duplicate_confirmations: u64,

    /// Enrichment lookups attempted (transactions with an on-chain hash)
    pub enrichment_attempts: u64,

    /// Lookups that yielded or confirmed gas data
    pub enriched: u64,

    /// Lookups that failed or found nothing
    pub enrichment_failures: u64,
}

/// One row of the per-signer statistics table
#[derive(Debug, Clone)]
pub struct SignerRow {
    pub address: String,
    pub class: SignerClass,
    pub proposals: u64,
    pub confirmations: u64,
    pub executions: u64,
    pub gas_paid_eth: f64,
    pub gas_samples: u64,
    pub mean_time_to_execution_mins: Option<f64>,
}

/// Final immutable aggregate for one run
#[derive(Debug, Clone)]
pub struct StatisticsSnapshot {
    pub safe_address: String,
    pub threshold: u32,
    pub version: Option<String>,
    pub owners: Vec<String>,

    pub total_transactions: u64,
    pub executed_transactions: u64,

    /// Executed transactions whose fee is known; the gas-total denominator
    pub executed_with_gas: u64,

    /// Sum of known fees, ETH-equivalent
    pub total_fees_eth: f64,

    pub oldest_submission: Option<DateTime<Utc>>,
    pub newest_submission: Option<DateTime<Utc>>,

    /// Time-to-execution distribution in minutes; `None` when no
    /// transaction had usable timestamps
    pub execution_stats: Option<SummaryStats>,

    pub signers: Vec<SignerRow>,

    pub counters: RunCounters,

    pub enrichment_enabled: bool,
}

impl StatisticsSnapshot {
    /// Whether the gas totals cover fewer transactions than were executed
    pub fn gas_totals_are_partial(&self) -> bool {
        self.executed_with_gas < self.executed_transactions
    }
}

/// Strict left-fold over the chronological transaction stream.
///
/// Owns the single `SignerLedger` of the run and the explicitly passed
/// owner-set snapshot; single-threaded by design.
pub struct Aggregator {
    owner_set: OwnerSet,
    ledger: SignerLedger,
    counters: RunCounters,
    enrichment_enabled: bool,

    total_transactions: u64,
    executed_transactions: u64,
    executed_with_gas: u64,
    total_fees_eth: f64,
    time_to_execution_mins: Vec<f64>,
    oldest_submission: Option<DateTime<Utc>>,
    newest_submission: Option<DateTime<Utc>>,
    last_nonce: Option<u64>,
}

impl Aggregator {
    pub fn new(owner_set: OwnerSet, enrichment_enabled: bool) -> Self {
        Self {
            owner_set,
            ledger: SignerLedger::new(),
            counters: RunCounters::default(),
            enrichment_enabled,
            total_transactions: 0,
            executed_transactions: 0,
            executed_with_gas: 0,
            total_fees_eth: 0.0,
            time_to_execution_mins: Vec::new(),
            oldest_submission: None,
            newest_submission: None,
            last_nonce: None,
        }
    }

    /// Count a raw record the normalizer rejected
    pub fn record_skip(&mut self) {
        self.counters.skipped_records += 1;
    }

    /// Count the outcome of one enrichment attempt
    pub fn record_enrichment(&mut self, outcome: &EnrichOutcome) {
        match outcome {
            EnrichOutcome::Enriched | EnrichOutcome::AlreadyComplete => {
                self.counters.enrichment_attempts += 1;
                self.counters.enriched += 1;
            }
            EnrichOutcome::Failed => {
                self.counters.enrichment_attempts += 1;
                self.counters.enrichment_failures += 1;
            }
            EnrichOutcome::NotExecuted => {}
        }
    }

    /// Fold one transaction into the running aggregates
    pub fn observe(&mut self, tx: &CanonicalTransaction) {
        self.total_transactions += 1;

        if let Some(last) = self.last_nonce {
            if tx.nonce == last {
                warn!(
                    "{} shares nonce {} with its predecessor (replaced proposal?)",
                    short(&tx.safe_tx_hash),
                    tx.nonce
                );
                self.counters.duplicate_nonces += 1;
            } else if tx.nonce < last {
                debug!(
                    "{} arrived out of nonce order ({} after {})",
                    short(&tx.safe_tx_hash),
                    tx.nonce,
                    last
                );
            }
        }
        self.last_nonce = Some(tx.nonce);

        if let Some(submitted) = tx.submission_time {
            if self.oldest_submission.map_or(true, |t| submitted < t) {
                self.oldest_submission = Some(submitted);
            }
            if self.newest_submission.map_or(true, |t| submitted > t) {
                self.newest_submission = Some(submitted);
            }
        }

        if tx.selector.is_malformed() {
            self.counters.malformed_call_data += 1;
        }

        if let Some(proposer) = &tx.proposer {
            self.ledger.record_proposal(proposer);
        }

        // exactly one confirmation per signer per transaction
        let mut confirmed: HashSet<String> = HashSet::new();
        for confirmation in &tx.confirmations {
            if confirmed.insert(normalize_address(&confirmation.owner)) {
                self.ledger.record_confirmation(&confirmation.owner);
            } else {
                debug!(
                    "{} duplicate confirmation by {}",
                    short(&tx.safe_tx_hash),
                    short(&confirmation.owner)
                );
                self.counters.duplicate_confirmations += 1;
            }
        }

        if let Some(executor) = &tx.executor {
            self.executed_transactions += 1;

            let time_to_execution = self.time_to_execution(tx);
            if let Some(minutes) = time_to_execution {
                self.time_to_execution_mins.push(minutes);
            }

            if let Some(fee) = tx.fee_eth {
                self.executed_with_gas += 1;
                self.total_fees_eth += fee;
            }

            self.ledger
                .record_execution(executor, tx.fee_eth, time_to_execution);
        }
    }

    /// Seal the fold into the final snapshot
    pub fn finish(self) -> StatisticsSnapshot {
        let signers = self
            .ledger
            .iter_sorted()
            .into_iter()
            .map(|stats| SignerRow {
                class: self.owner_set.classify(&stats.display_address),
                address: stats.display_address.clone(),
                proposals: stats.proposals,
                confirmations: stats.confirmations,
                executions: stats.executions,
                gas_paid_eth: stats.gas_paid_eth,
                gas_samples: stats.gas_samples,
                mean_time_to_execution_mins: stats.mean_time_to_execution(),
            })
            .collect();

        StatisticsSnapshot {
            safe_address: self.owner_set.safe_address().to_string(),
            threshold: self.owner_set.threshold(),
            version: self.owner_set.version().map(String::from),
            owners: self.owner_set.owners().to_vec(),
            total_transactions: self.total_transactions,
            executed_transactions: self.executed_transactions,
            executed_with_gas: self.executed_with_gas,
            total_fees_eth: self.total_fees_eth,
            oldest_submission: self.oldest_submission,
            newest_submission: self.newest_submission,
            execution_stats: SummaryStats::from_samples(&self.time_to_execution_mins),
            signers,
            counters: self.counters,
            enrichment_enabled: self.enrichment_enabled,
        }
    }

    /// Minutes from submission to execution; `None` when either timestamp
    /// is missing or the duration would be negative (counted as anomaly)
    fn time_to_execution(&mut self, tx: &CanonicalTransaction) -> Option<f64> {
        let submitted = tx.submission_time?;
        let executed = tx.execution_time?;

        if executed < submitted {
            warn!(
                "{} executed before submission ({} < {}), excluded from distribution",
                short(&tx.safe_tx_hash),
                executed,
                submitted
            );
            self.counters.negative_durations += 1;
            return None;
        }

        Some((executed - submitted).num_seconds() as f64 / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::schema::{CallSelector, CanonicalTransaction, Confirmation};
    use chrono::TimeZone;

    const OWNER_X: &str = "0xaaa0000000000000000000000000000000000001";

    fn owner_set() -> OwnerSet {
        OwnerSet::new(
            "0x5afe000000000000000000000000000000000001",
            1,
            Some("1.3.0".to_string()),
            vec![OWNER_X.to_string()],
        )
    }

    fn tx(nonce: u64) -> CanonicalTransaction {
        CanonicalTransaction {
            safe_tx_hash: format!("0xsafe{:04}", nonce),
            transaction_hash: None,
            nonce,
            block_number: None,
            submission_time: Some(Utc.with_ymd_and_hms(2023, 5, 1, 10, 0, 0).unwrap()),
            execution_time: None,
            proposer: None,
            executor: None,
            to: None,
            value_eth: 0.0,
            operation: 0,
            safe_tx_gas: 0,
            decoded_method: None,
            selector: CallSelector::EthTransfer,
            payload_length: 0,
            confirmations: Vec::new(),
            is_successful: None,
            gas_price_gwei: None,
            gas_used: None,
            fee_eth: None,
        }
    }

    fn executed_tx(nonce: u64, minutes_to_execute: i64) -> CanonicalTransaction {
        let mut t = tx(nonce);
        t.transaction_hash = Some(format!("0xchain{:04}", nonce));
        t.executor = Some(OWNER_X.to_string());
        t.execution_time =
            t.submission_time.map(|s| s + chrono::Duration::minutes(minutes_to_execute));
        t
    }

    #[test]
    fn test_summary_stats_empty_is_none() {
        assert_eq!(SummaryStats::from_samples(&[]), None);
    }

    #[test]
    fn test_summary_stats_single_sample() {
        let stats = SummaryStats::from_samples(&[42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.max, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.stdev, 0.0);
    }

    #[test]
    fn test_summary_stats_even_count_median() {
        let stats = SummaryStats::from_samples(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_duplicate_confirmations_count_once() {
        let mut aggregator = Aggregator::new(owner_set(), false);
        let mut t = tx(0);
        t.confirmations = vec![
            Confirmation {
                owner: OWNER_X.to_string(),
                confirmed_at: None,
            },
            Confirmation {
                // same signer, different casing
                owner: OWNER_X.to_ascii_uppercase().replacen("0XAAA", "0xAAA", 1),
                confirmed_at: None,
            },
        ];
        aggregator.observe(&t);

        let snapshot = aggregator.finish();
        assert_eq!(snapshot.signers.len(), 1);
        assert_eq!(snapshot.signers[0].confirmations, 1);
        assert_eq!(snapshot.counters.duplicate_confirmations, 1);
    }

    #[test]
    fn test_negative_duration_excluded_and_counted() {
        let mut aggregator = Aggregator::new(owner_set(), false);
        let mut bad = executed_tx(0, 30);
        bad.execution_time = bad.submission_time.map(|s| s - chrono::Duration::minutes(5));
        aggregator.observe(&bad);
        aggregator.observe(&executed_tx(1, 20));

        let snapshot = aggregator.finish();
        assert_eq!(snapshot.executed_transactions, 2);
        assert_eq!(snapshot.counters.negative_durations, 1);
        let stats = snapshot.execution_stats.unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 20.0);
    }

    #[test]
    fn test_missing_timestamps_excluded_without_anomaly() {
        let mut aggregator = Aggregator::new(owner_set(), false);
        let mut pending = executed_tx(0, 0);
        pending.execution_time = None;
        aggregator.observe(&pending);

        let snapshot = aggregator.finish();
        assert_eq!(snapshot.executed_transactions, 1);
        assert_eq!(snapshot.execution_stats, None);
        assert_eq!(snapshot.counters.negative_durations, 0);
    }

    #[test]
    fn test_executor_gas_totals_scenario() {
        // three executions at 21000 gas, 20 gwei each
        let mut aggregator = Aggregator::new(owner_set(), false);
        for nonce in 0..3 {
            let mut t = executed_tx(nonce, 10);
            t.gas_used = Some(21_000);
            t.gas_price_gwei = Some(20.0);
            t.fee_eth = Some(21_000.0 * 20.0 * 1e-9);
            aggregator.observe(&t);
        }

        let snapshot = aggregator.finish();
        assert_eq!(snapshot.signers.len(), 1);
        let row = &snapshot.signers[0];
        assert_eq!(row.executions, 3);
        assert_eq!(row.class, SignerClass::CurrentOwner);
        assert!((row.gas_paid_eth - 0.00126).abs() < 1e-9);
        assert!((snapshot.total_fees_eth - 0.00126).abs() < 1e-9);
        assert_eq!(snapshot.executed_with_gas, 3);
        assert!(!snapshot.gas_totals_are_partial());
    }

    #[test]
    fn test_execution_without_gas_keeps_denominators_separate() {
        let mut aggregator = Aggregator::new(owner_set(), false);
        let mut with_gas = executed_tx(0, 10);
        with_gas.fee_eth = Some(0.001);
        aggregator.observe(&with_gas);
        aggregator.observe(&executed_tx(1, 10)); // no gas data

        let snapshot = aggregator.finish();
        assert_eq!(snapshot.executed_transactions, 2);
        assert_eq!(snapshot.executed_with_gas, 1);
        assert!(snapshot.gas_totals_are_partial());
        assert_eq!(snapshot.signers[0].executions, 2);
        assert_eq!(snapshot.signers[0].gas_samples, 1);
    }

    #[test]
    fn test_duplicate_nonce_detected() {
        let mut aggregator = Aggregator::new(owner_set(), false);
        aggregator.observe(&tx(4));
        aggregator.observe(&tx(4));
        aggregator.observe(&tx(5));

        let snapshot = aggregator.finish();
        assert_eq!(snapshot.total_transactions, 3);
        assert_eq!(snapshot.counters.duplicate_nonces, 1);
    }

    #[test]
    fn test_enrichment_counters() {
        let mut aggregator = Aggregator::new(owner_set(), true);
        for _ in 0..8 {
            aggregator.record_enrichment(&EnrichOutcome::Enriched);
        }
        aggregator.record_enrichment(&EnrichOutcome::Failed);
        aggregator.record_enrichment(&EnrichOutcome::Failed);
        aggregator.record_enrichment(&EnrichOutcome::NotExecuted);

        let snapshot = aggregator.finish();
        assert_eq!(snapshot.counters.enrichment_attempts, 10);
        assert_eq!(snapshot.counters.enriched, 8);
        assert_eq!(snapshot.counters.enrichment_failures, 2);
    }

    #[test]
    fn test_date_range_tracks_submissions() {
        let mut aggregator = Aggregator::new(owner_set(), false);
        let mut early = tx(0);
        early.submission_time = Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        let mut late = tx(1);
        late.submission_time = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        aggregator.observe(&early);
        aggregator.observe(&late);

        let snapshot = aggregator.finish();
        assert_eq!(snapshot.oldest_submission, early.submission_time);
        assert_eq!(snapshot.newest_submission, late.submission_time);
    }

    #[test]
    fn test_historical_signer_classification() {
        let mut aggregator = Aggregator::new(owner_set(), false);
        let mut t = executed_tx(0, 5);
        t.executor = Some("0xdead000000000000000000000000000000000099".to_string());
        aggregator.observe(&t);

        let snapshot = aggregator.finish();
        assert_eq!(snapshot.signers[0].class, SignerClass::HistoricalSigner);
        // totals accumulate regardless of classification
        assert_eq!(snapshot.signers[0].executions, 1);
    }
}
