// ABOUTME: Input source resolution for the data files fed to templates
// ABOUTME: Exports whole-input readers for files and piped standard input

pub mod error;
pub mod source;

pub use error::{InputError, Result};
pub use source::{read_input, read_stdin};
