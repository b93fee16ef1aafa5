//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while talking to the Safe transaction service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid service response: {0}")]
    InvalidResponse(String),

    #[error("pagination failed: {0}")]
    Pagination(String),
}

/// Errors that can occur during RPC enrichment lookups
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),
}

/// Errors that reject a single raw record during normalization
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("record is not a valid transaction object: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("record missing required field `{0}`")]
    MissingField(&'static str),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}
