// ABOUTME: Normalizers that turn raw tabular or nested input into the value model
// ABOUTME: Exports format detection and the CSV and JSON document builders

pub mod error;
pub mod hierarchical;
pub mod tabular;

pub use error::{NormalizeError, Result};
pub use hierarchical::parse_json;
pub use tabular::{parse_csv, placeholder_name, CsvHeader, CsvOptions};

use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::value::Value;

/// Supported input document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Detect the format from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let format = match ext.as_str() {
            "csv" => InputFormat::Csv,
            "json" => InputFormat::Json,
            _ => return Err(NormalizeError::UnsupportedFormat(ext)),
        };
        debug!("File type: {}", format);
        Ok(format)
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Csv => write!(f, "csv"),
            InputFormat::Json => write!(f, "json"),
        }
    }
}

/// Build a document from a complete input in the given format.
pub fn normalize(format: InputFormat, input: &[u8], options: &CsvOptions) -> Result<Value> {
    match format {
        InputFormat::Csv => parse_csv(input, options),
        InputFormat::Json => parse_json(input),
    }
}
