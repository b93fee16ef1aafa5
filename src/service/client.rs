//! HTTP client for the Safe transaction service.
//!
//! The multisig transaction listing is cursor-paginated; `TransactionStream`
//! follows `next` URLs lazily, one page at a time, preserving the service's
//! chronological (`ordering=nonce`) order. Transport errors and 429/5xx
//! responses are retried a bounded number of times, then surface as fatal.

use super::types::{Page, SafeInfo};
use crate::utils::config::{
    DEFAULT_HTTP_TIMEOUT, PAGE_LIMIT, SERVICE_MAX_RETRIES, SERVICE_RETRY_DELAY,
};
use crate::utils::error::ServiceError;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;

/// Client for the Safe transaction service REST API
pub struct ServiceClient {
    client: Client,
    base_url: String,
}

impl ServiceClient {
    /// Create a new service client
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(ServiceError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the Safe overview (owners, threshold, contract version)
    pub fn safe_info(&self, safe_address: &str) -> Result<SafeInfo, ServiceError> {
        let url = format!("{}/api/v1/safes/{}/", self.base_url, safe_address);
        info!("Fetching Safe info: {}", url);
        self.get_json(&url)
    }

    /// Lazily iterate over all multisig transaction records for a Safe,
    /// oldest nonce first
    pub fn multisig_transactions(&self, safe_address: &str) -> TransactionStream<'_> {
        let first = format!(
            "{}/api/v1/safes/{}/multisig-transactions/?limit={}&ordering=nonce",
            self.base_url, safe_address, PAGE_LIMIT
        );
        TransactionStream::new(self, first)
    }

    /// GET a JSON document with bounded retry on transient failures
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ServiceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_get_json(url) {
                Ok(value) => return Ok(value),
                Err(err) if attempt <= SERVICE_MAX_RETRIES && is_transient(&err) => {
                    warn!(
                        "service request failed ({}), retrying in {:?} ({}/{})",
                        err, SERVICE_RETRY_DELAY, attempt, SERVICE_MAX_RETRIES
                    );
                    std::thread::sleep(SERVICE_RETRY_DELAY);
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn try_get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ServiceError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(ServiceError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        response
            .json()
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }
}

/// Whether a service error is worth retrying
fn is_transient(err: &ServiceError) -> bool {
    match err {
        ServiceError::RequestFailed(_) => true,
        ServiceError::Http { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Lazy iterator over raw multisig transaction records.
///
/// Fetches one page at a time; yields `Err` once on a fatal failure, then
/// terminates. A `next` cursor pointing back at the current page is treated
/// as a fatal pagination error rather than looping forever.
pub struct TransactionStream<'a> {
    client: &'a ServiceClient,
    next_url: Option<String>,
    buffer: VecDeque<serde_json::Value>,
    pages_fetched: u64,
    failed: bool,
}

impl<'a> TransactionStream<'a> {
    fn new(client: &'a ServiceClient, first_url: String) -> Self {
        Self {
            client,
            next_url: Some(first_url),
            buffer: VecDeque::new(),
            pages_fetched: 0,
            failed: false,
        }
    }

    fn fetch_next_page(&mut self) -> Result<(), ServiceError> {
        let url = match self.next_url.take() {
            Some(url) => url,
            None => return Ok(()),
        };

        debug!("Fetching page {}: {}", self.pages_fetched + 1, url);
        let page: Page = self.client.get_json(&url)?;
        self.pages_fetched += 1;

        if page.next.as_deref() == Some(url.as_str()) {
            return Err(ServiceError::Pagination(format!(
                "next cursor loops back to {}",
                url
            )));
        }

        debug!(
            "Page {} holds {} records (total reported: {:?})",
            self.pages_fetched,
            page.results.len(),
            page.count
        );

        self.buffer.extend(page.results);
        self.next_url = page.next;
        Ok(())
    }
}

impl Iterator for TransactionStream<'_> {
    type Item = Result<serde_json::Value, ServiceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while self.buffer.is_empty() {
            self.next_url.as_ref()?;
            if let Err(err) = self.fetch_next_page() {
                self.failed = true;
                return Some(Err(err));
            }
        }

        self.buffer.pop_front().map(Ok)
    }
}
