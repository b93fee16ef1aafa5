//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default Safe transaction service endpoint (Ethereum mainnet)
pub const DEFAULT_SERVICE_URL: &str = "https://safe-transaction-mainnet.safe.global";

/// Default timeout for HTTP requests (service and RPC)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size requested from the transaction service
pub const PAGE_LIMIT: u32 = 100;

/// Transient service failures (429/5xx, transport) are retried this many times
pub const SERVICE_MAX_RETRIES: u32 = 3;

/// Delay between service retries
pub const SERVICE_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Single timestamp format used across the CSV export and the report
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
