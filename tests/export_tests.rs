//! CSV export behavior over normalized records.

use safe_stats::normalizer::normalize_record;
use safe_stats::output::{write_transactions, CSV_HEADERS};
use serde_json::json;

#[test]
fn export_writes_one_row_per_transaction() {
    let executed = normalize_record(&json!({
        "safeTxHash": "0xsafe0000000000000000000000000000000000000000000000000000000001",
        "transactionHash": "0xchain000000000000000000000000000000000000000000000000000000001",
        "nonce": 0,
        "blockNumber": 1_000_000,
        "submissionDate": "2023-05-01T10:00:00Z",
        "executionDate": "2023-05-01T10:30:00Z",
        "executor": "0xaaa0000000000000000000000000000000000001",
        "value": "1000000000000000000",
        "gasUsed": 21000,
        "ethGasPrice": "20000000000",
        "fee": "420000000000000"
    }))
    .unwrap();

    let pending = normalize_record(&json!({
        "safeTxHash": "0xsafe0000000000000000000000000000000000000000000000000000000002",
        "nonce": 1,
        "submissionDate": "2023-05-02T10:00:00Z"
    }))
    .unwrap();

    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("history.csv");
    write_transactions(&[executed, pending], &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3); // header + 2 rows
    assert_eq!(lines[0], CSV_HEADERS.join(","));

    // executed row carries the gas columns
    assert!(lines[1].contains("2023-05-01 10:30:00"));
    assert!(lines[1].contains("20.000"));
    assert!(lines[1].contains("0.000420"));

    // pending row keeps execution-side cells empty but is present
    assert!(lines[2].starts_with(",1,2023-05-02 10:00:00,,"));
}
