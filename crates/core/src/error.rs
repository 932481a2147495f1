//! Error types for the Consilium domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all Consilium operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Classification errors ---
    #[error("Classification failed: {0}")]
    Classification(#[from] ClassificationError),

    // --- Record store errors ---
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// A dataset the request depends on is not present on disk.
    #[error("Dataset not found: {}", path.display())]
    MissingDataset { path: PathBuf },

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Why a piece of model output could not be read as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model output")]
    NoObject,

    #[error("unterminated JSON object starting at byte {start}")]
    Unbalanced { start: usize },

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("JSON value is not an object")]
    NotAnObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("reply has no `category` string")]
    MissingCategory,

    #[error("'{0}' is not a known category")]
    UnknownCategory(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read dataset {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Malformed row {row} in {path}: {reason}")]
    MalformedRow {
        path: PathBuf,
        row: u64,
        reason: String,
    },

    #[error("Invalid HCL identifier '{0}', expected <number>/<year>")]
    InvalidIdentifier(String),

    #[error("Duplicate HCL identifier {0}")]
    DuplicateIdentifier(String),
}
