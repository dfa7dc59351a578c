// ABOUTME: Error types for template loading, rendering and helper function calls
// ABOUTME: Parse and execution failures are kept distinct for the caller

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template file {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse template '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: handlebars::TemplateError,
    },

    #[error("Failed to execute template '{name}': {source}")]
    Execution {
        name: String,
        #[source]
        source: handlebars::RenderError,
    },
}

/// Failure raised by a library function for a call that cannot proceed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FunctionError {
    #[error("{function}: {reason}")]
    Arithmetic {
        function: &'static str,
        reason: String,
    },

    #[error("{function}: {reason}")]
    InvalidArgument {
        function: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, TemplateError>;
pub type FunctionResult<T> = std::result::Result<T, FunctionError>;
