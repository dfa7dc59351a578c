// ABOUTME: Error types for turning raw input into documents
// ABOUTME: Distinguishes malformed, empty and unsupported inputs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("failed to read csv lines: {0}")]
    MalformedCsv(#[from] csv::Error),

    #[error("failed to unmarshal input data: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("input is empty: no header row")]
    Empty,

    #[error("file type '{0}' not supported")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
