// ABOUTME: Error types for re-serializing values into JSON and XML text
// ABOUTME: Marshal errors are reported inline by the template helpers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarshalError {
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("invalid element name {0:?}")]
    InvalidName(String),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("write failed: {0}")]
    Write(String),
}

pub type Result<T> = std::result::Result<T, MarshalError>;
