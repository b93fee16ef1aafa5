//! End-to-end scenarios over the normalization and aggregation pipeline,
//! driven by raw service-shaped JSON records.

use safe_stats::aggregator::{Aggregator, OwnerSet, SignerClass};
use safe_stats::enrich::{enrich_transaction, EnrichOutcome, GasInfo, GasLookup};
use safe_stats::normalizer::normalize_record;
use safe_stats::utils::error::RpcError;
use serde_json::json;

const SAFE: &str = "0x5afe000000000000000000000000000000000001";
const OWNER_X: &str = "0xaaa0000000000000000000000000000000000001";
const OWNER_Y: &str = "0xbbb0000000000000000000000000000000000002";

fn owner_set() -> OwnerSet {
    OwnerSet::new(
        SAFE,
        2,
        Some("1.3.0".to_string()),
        vec![OWNER_X.to_string(), OWNER_Y.to_string()],
    )
}

fn raw_executed_record(nonce: u64, executor: &str) -> serde_json::Value {
    json!({
        "safeTxHash": format!("0xsafe{:060}", nonce),
        "transactionHash": format!("0xchain{:059}", nonce),
        "nonce": nonce,
        "blockNumber": 1_000_000 + nonce,
        "submissionDate": "2023-05-01T10:00:00Z",
        "executionDate": "2023-05-01T10:30:00Z",
        "executor": executor,
        "to": "0xccc0000000000000000000000000000000000003",
        "value": "0",
        "operation": 0,
        "safeTxGas": 0,
        "data": null,
        "confirmations": [
            { "owner": OWNER_X, "submissionDate": "2023-05-01T10:05:00Z" }
        ],
        "isExecuted": true,
        "isSuccessful": true
    })
}

/// Lookup that knows gas data for every hash except the listed ones
struct PartialLookup {
    missing: Vec<String>,
}

impl GasLookup for PartialLookup {
    fn fetch_gas_info(&self, tx_hash: &str) -> Result<Option<GasInfo>, RpcError> {
        if self.missing.iter().any(|m| m == tx_hash) {
            return Err(RpcError::TransactionNotFound(tx_hash.to_string()));
        }
        Ok(Some(GasInfo {
            gas_price_wei: 20_000_000_000,
            gas_used: 21_000,
        }))
    }
}

#[test]
fn scenario_a_executor_gas_totals() {
    // 3 transactions, nonces 0..2, all executed by X at 21000 gas / 20 gwei
    let lookup = PartialLookup { missing: vec![] };
    let mut aggregator = Aggregator::new(owner_set(), true);

    for nonce in 0..3 {
        let mut tx = normalize_record(&raw_executed_record(nonce, OWNER_X)).unwrap();
        let outcome = enrich_transaction(&mut tx, &lookup);
        assert_eq!(outcome, EnrichOutcome::Enriched);
        aggregator.record_enrichment(&outcome);
        aggregator.observe(&tx);
    }

    let snapshot = aggregator.finish();
    let executor_row = snapshot
        .signers
        .iter()
        .find(|row| row.address.eq_ignore_ascii_case(OWNER_X))
        .unwrap();

    assert_eq!(executor_row.executions, 3);
    assert!((executor_row.gas_paid_eth - 0.00126).abs() < 1e-9);
    assert!((snapshot.total_fees_eth - 0.00126).abs() < 1e-9);
}

#[test]
fn scenario_b_unexecuted_transaction_counted_but_excluded_from_distribution() {
    let mut aggregator = Aggregator::new(owner_set(), false);

    let pending = json!({
        "safeTxHash": "0xsafependingrecord",
        "nonce": 9,
        "submissionDate": "2023-06-01T00:00:00Z",
        "confirmations": [{ "owner": OWNER_Y }]
    });
    let tx = normalize_record(&pending).unwrap();
    assert_eq!(tx.execution_time, None);
    aggregator.observe(&tx);

    let executed = normalize_record(&raw_executed_record(10, OWNER_X)).unwrap();
    aggregator.observe(&executed);

    let snapshot = aggregator.finish();
    assert_eq!(snapshot.total_transactions, 2);
    assert_eq!(snapshot.executed_transactions, 1);
    // distribution only covers the executed transaction
    assert_eq!(snapshot.execution_stats.unwrap().count, 1);
}

#[test]
fn scenario_c_partial_enrichment_is_reported() {
    // lookups fail for 2 of 10 transactions
    let missing: Vec<String> = (8..10).map(|n| format!("0xchain{:059}", n)).collect();
    let lookup = PartialLookup { missing };
    let mut aggregator = Aggregator::new(owner_set(), true);

    for nonce in 0..10 {
        let mut tx = normalize_record(&raw_executed_record(nonce, OWNER_X)).unwrap();
        let outcome = enrich_transaction(&mut tx, &lookup);
        aggregator.record_enrichment(&outcome);
        aggregator.observe(&tx);
    }

    let snapshot = aggregator.finish();
    assert_eq!(snapshot.counters.enrichment_attempts, 10);
    assert_eq!(snapshot.counters.enriched, 8);
    assert_eq!(snapshot.counters.enrichment_failures, 2);

    // gas totals come from the 8 enriched transactions only
    assert_eq!(snapshot.executed_transactions, 10);
    assert_eq!(snapshot.executed_with_gas, 8);
    assert!(snapshot.gas_totals_are_partial());
    assert!((snapshot.total_fees_eth - 8.0 * 0.00042).abs() < 1e-9);
}

#[test]
fn scenario_d_short_call_data_is_anomaly_but_still_aggregated() {
    let mut aggregator = Aggregator::new(owner_set(), false);

    let mut record = raw_executed_record(0, OWNER_X);
    record["data"] = json!("0xbeef");
    let tx = normalize_record(&record).unwrap();

    assert!(tx.selector.is_malformed());
    assert_eq!(tx.payload_length, 2);

    aggregator.observe(&tx);
    let snapshot = aggregator.finish();

    assert_eq!(snapshot.counters.malformed_call_data, 1);
    assert_eq!(snapshot.total_transactions, 1);
    assert_eq!(snapshot.executed_transactions, 1);
    assert_eq!(snapshot.signers.len(), 1);
}

#[test]
fn duplicate_confirmations_increment_once() {
    let mut aggregator = Aggregator::new(owner_set(), false);

    let mut record = raw_executed_record(0, OWNER_X);
    record["confirmations"] = json!([
        { "owner": OWNER_Y, "submissionDate": "2023-05-01T10:05:00Z" },
        { "owner": OWNER_Y, "submissionDate": "2023-05-01T10:05:00Z" }
    ]);
    let tx = normalize_record(&record).unwrap();
    aggregator.observe(&tx);

    let snapshot = aggregator.finish();
    let row = snapshot
        .signers
        .iter()
        .find(|row| row.address.eq_ignore_ascii_case(OWNER_Y))
        .unwrap();
    assert_eq!(row.confirmations, 1);
    assert_eq!(snapshot.counters.duplicate_confirmations, 1);
}

#[test]
fn skipped_records_are_counted_not_fatal() {
    let mut aggregator = Aggregator::new(owner_set(), false);

    let broken = json!({ "submissionDate": "2023-05-01T10:00:00Z" });
    match normalize_record(&broken) {
        Ok(_) => panic!("record without hash/nonce must be rejected"),
        Err(_) => aggregator.record_skip(),
    }

    let tx = normalize_record(&raw_executed_record(1, OWNER_X)).unwrap();
    aggregator.observe(&tx);

    let snapshot = aggregator.finish();
    assert_eq!(snapshot.counters.skipped_records, 1);
    assert_eq!(snapshot.total_transactions, 1);
}

#[test]
fn historical_executor_still_accumulates() {
    let old_signer = "0xdead000000000000000000000000000000000099";
    let mut aggregator = Aggregator::new(owner_set(), false);

    let tx = normalize_record(&raw_executed_record(0, old_signer)).unwrap();
    aggregator.observe(&tx);

    let snapshot = aggregator.finish();
    let row = snapshot
        .signers
        .iter()
        .find(|row| row.address.eq_ignore_ascii_case(old_signer))
        .unwrap();
    assert_eq!(row.class, SignerClass::HistoricalSigner);
    assert_eq!(row.executions, 1);
}
