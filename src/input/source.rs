// ABOUTME: Reads a complete input document from a file path or standard input
// ABOUTME: Refuses to block on an interactive terminal when no file is given

use std::io::{self, IsTerminal, Read};
use std::path::Path;
use tracing::debug;

use super::error::{InputError, Result};

/// Read the whole input. No path means standard input.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            debug!("Reading input file: {}", path.display());
            std::fs::read(path).map_err(|source| InputError::Unavailable {
                path: path.to_path_buf(),
                source,
            })
        }
        None => {
            debug!("File not provided, using stdin");
            read_stdin()
        }
    }
}

/// Read standard input to the end, failing if it is attached to a terminal.
pub fn read_stdin() -> Result<Vec<u8>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(InputError::StdinIsTerminal);
    }

    let mut buffer = Vec::new();
    stdin
        .lock()
        .read_to_end(&mut buffer)
        .map_err(InputError::Stdin)?;
    debug!("Read {} bytes from stdin", buffer.len());
    Ok(buffer)
}
