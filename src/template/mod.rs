// ABOUTME: Template module binding documents to Handlebars with the function library
// ABOUTME: Exports the render driver, helper adapter and pure template functions

pub mod engine;
pub mod error;
pub mod functions;
pub mod helpers;

pub use engine::{render_template, RenderOptions, TemplateEngine, TemplateSource};
pub use error::{FunctionError, Result, TemplateError};
pub use functions::{lookup, TemplateFn, ATOF_SENTINEL, ATOI_SENTINEL, FUNCTIONS};
