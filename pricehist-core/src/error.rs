//! Structured error types for scraping operations.
//!
//! Every pipeline operation returns `Result<_, ScrapeError>`. The silent,
//! log-only failure policy lives in [`crate::errlog::guard`] and is opt-in.

use std::path::PathBuf;
use thiserror::Error;

/// A field of a price observation failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("field `{field}` is missing")]
    Missing { field: &'static str },

    #[error("field `{field}` expected {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field `{field}` is not a decimal number: {text:?}")]
    NotADecimal { field: &'static str, text: String },

    #[error("field `{field}` must be a finite non-negative number, got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("field `symbol` must not be empty")]
    EmptySymbol,
}

/// Errors produced by period conversion, fetching, extraction and export.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("cannot parse date {input:?} with format {format:?}")]
    DateParse {
        input: String,
        format: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("date cannot be represented as an epoch timestamp: {0}")]
    InvalidDate(String),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid CSS selector {css:?}: {reason}")]
    Selector { css: &'static str, reason: String },

    #[error("historical-prices table not found in page for {symbol}")]
    TableNotFound { symbol: String },

    #[error("row {index} is not a price row: {reason}")]
    MalformedRow { index: usize, reason: String },

    #[error("row {index} failed validation")]
    RowValidation {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed")]
    Serialize(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("nothing extracted yet for {symbol}; run an extraction before exporting")]
    NothingExtracted { symbol: String },
}

impl ScrapeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io {
            path: path.into(),
            source,
        }
    }
}
