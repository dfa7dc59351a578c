// ABOUTME: Main library module for the tpl template renderer
// ABOUTME: Exports the value model, normalizers, template engine and CLI

pub mod cli;
pub mod input;
pub mod normalize;
pub mod template;
pub mod value;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use normalize::{normalize, CsvOptions, InputFormat};
pub use template::{render_template, RenderOptions, TemplateEngine, TemplateSource};
pub use value::{Record, Scalar, Value};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
