// ABOUTME: Error types for resolving and reading input data
// ABOUTME: Covers missing files and interactive terminals on standard input

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to open file [{}]: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stdin is a terminal; pipe or redirect input")]
    StdinIsTerminal,

    #[error("failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InputError>;
