// ABOUTME: Render driver binding a template source and a document to Handlebars
// ABOUTME: Loads inline or file templates, registers partials and streams output

use handlebars::Handlebars;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::{Result, TemplateError};
use super::helpers;
use crate::value::Value;

/// Name an inline template is registered under.
pub const INLINE_TEMPLATE_NAME: &str = "root";

/// Where the root template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Inline(String),
    File(PathBuf),
}

impl TemplateSource {
    /// Registered name: the file's base name, or `root` for inline text.
    pub fn name(&self) -> String {
        match self {
            TemplateSource::Inline(_) => INLINE_TEMPLATE_NAME.to_string(),
            TemplateSource::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

/// Engine behaviour chosen by the caller.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Fail on missing fields instead of rendering them empty.
    pub strict_mode: bool,
    /// Extra template files registered as partials under their file stem.
    pub partials: Vec<PathBuf>,
}

pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create an engine with the function library and any partials registered.
    pub fn new(options: &RenderOptions) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(options.strict_mode);

        // Output is plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        helpers::register_helpers(&mut handlebars);

        let mut engine = Self { handlebars };
        for partial in &options.partials {
            let name = partial
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| partial.display().to_string());
            let text = read_template(partial)?;
            engine.register(&name, &text)?;
            debug!("Registered partial '{}' from {}", name, partial.display());
        }

        Ok(engine)
    }

    /// Parse a template source and return the name it was registered under.
    pub fn load(&mut self, source: &TemplateSource) -> Result<String> {
        let name = source.name();
        match source {
            TemplateSource::Inline(text) => self.register(&name, text)?,
            TemplateSource::File(path) => {
                let text = read_template(path)?;
                self.register(&name, &text)?;
            }
        }
        debug!(
            "Template parsed: name={} templates={:?}",
            name,
            self.template_names()
        );
        Ok(name)
    }

    /// Names of every registered template, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handlebars
            .get_templates()
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Execute a registered template, streaming into `writer`. Output written
    /// before a failure stays written.
    pub fn render_to_writer<W: Write>(&self, name: &str, document: &Value, writer: W) -> Result<()> {
        self.handlebars
            .render_to_write(name, &document.to_json(), writer)
            .map_err(|source| TemplateError::Execution {
                name: name.to_string(),
                source,
            })
    }

    /// Execute a registered template into a string.
    pub fn render_to_string(&self, name: &str, document: &Value) -> Result<String> {
        self.handlebars
            .render(name, &document.to_json())
            .map_err(|source| TemplateError::Execution {
                name: name.to_string(),
                source,
            })
    }

    /// Load `source` and render it against `document`.
    pub fn render<W: Write>(
        &mut self,
        source: &TemplateSource,
        document: &Value,
        writer: W,
    ) -> Result<()> {
        let name = self.load(source)?;
        self.render_to_writer(&name, document, writer)?;
        info!("Template executed successfully");
        Ok(())
    }

    fn register(&mut self, name: &str, text: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, text)
            .map_err(|source| TemplateError::Parse {
                name: name.to_string(),
                source,
            })
    }
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| TemplateError::Unavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Render `source` against `document` with a fresh engine.
pub fn render_template<W: Write>(
    source: &TemplateSource,
    document: &Value,
    options: &RenderOptions,
    writer: W,
) -> Result<()> {
    let mut engine = TemplateEngine::new(options)?;
    engine.render(source, document, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{parse_csv, parse_json, CsvOptions};
    use std::fs;
    use tempfile::tempdir;

    fn render_inline(template: &str, document: &Value) -> Result<String> {
        let mut output = Vec::new();
        render_template(
            &TemplateSource::Inline(template.to_string()),
            document,
            &RenderOptions::default(),
            &mut output,
        )?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_source_names() {
        assert_eq!(TemplateSource::Inline("x".to_string()).name(), "root");
        assert_eq!(
            TemplateSource::File(PathBuf::from("templates/main.tmpl")).name(),
            "main.tmpl"
        );
    }

    #[test]
    fn test_csv_rows_render() {
        let document =
            parse_csv(b"name,age\nAlice,30\nBob,\n", &CsvOptions::default()).unwrap();
        let output = render_inline("{{#each this}}{{name}}:{{age}}\n{{/each}}", &document).unwrap();
        assert_eq!(output, "Alice:30\nBob:\n");
    }

    #[test]
    fn test_json_len_renders() {
        let document = parse_json(br#"{"x": [1, 2, 3]}"#).unwrap();
        assert_eq!(render_inline("{{len x}}", &document).unwrap(), "3");
    }

    #[test]
    fn test_no_html_escaping() {
        let document = parse_json(br#"{"s": "<a & b>"}"#).unwrap();
        assert_eq!(render_inline("{{s}}", &document).unwrap(), "<a & b>");
    }

    #[test]
    fn test_missing_field_strict_mode() {
        let document = parse_json(br#"{"a": 1}"#).unwrap();
        assert_eq!(render_inline("[{{b}}]", &document).unwrap(), "[]");

        let options = RenderOptions {
            strict_mode: true,
            ..Default::default()
        };
        let mut engine = TemplateEngine::new(&options).unwrap();
        let err = engine
            .render(
                &TemplateSource::Inline("[{{b}}]".to_string()),
                &document,
                std::io::sink(),
            )
            .unwrap_err();
        assert!(matches!(err, TemplateError::Execution { .. }));
    }

    #[test]
    fn test_parse_error_is_distinct() {
        let err = render_inline("{{#each this}}", &Value::List(vec![])).unwrap_err();
        assert!(matches!(err, TemplateError::Parse { ref name, .. } if name == "root"));
    }

    #[test]
    fn test_execution_error_keeps_prior_output() {
        let mut output = Vec::new();
        let err = render_template(
            &TemplateSource::Inline("before {{div 1 0}} after".to_string()),
            &Value::List(vec![]),
            &RenderOptions::default(),
            &mut output,
        )
        .unwrap_err();

        assert!(matches!(err, TemplateError::Execution { .. }));
        assert_eq!(String::from_utf8(output).unwrap(), "before ");
    }

    #[test]
    fn test_file_template_with_inline_partial() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("report.tmpl");
        fs::write(
            &path,
            "{{#*inline \"row\"}}<{{name}}>{{/inline}}{{#each this}}{{> row}}{{/each}}",
        )
        .unwrap();

        let document = parse_csv(b"name\nA\nB\n", &CsvOptions::default()).unwrap();
        let mut engine = TemplateEngine::new(&RenderOptions::default()).unwrap();
        let name = engine.load(&TemplateSource::File(path)).unwrap();
        assert_eq!(name, "report.tmpl");
        assert_eq!(engine.render_to_string(&name, &document).unwrap(), "<A><B>");
    }

    #[test]
    fn test_partial_files() {
        let temp_dir = tempdir().unwrap();
        let partial = temp_dir.path().join("item.hbs");
        fs::write(&partial, "- {{this}}\n").unwrap();

        let options = RenderOptions {
            partials: vec![partial],
            ..Default::default()
        };
        let mut engine = TemplateEngine::new(&options).unwrap();
        assert_eq!(engine.template_names(), vec!["item"]);

        let name = engine
            .load(&TemplateSource::Inline("{{#each this}}{{> item}}{{/each}}".to_string()))
            .unwrap();
        let document = parse_json(br#"["a", "b"]"#).unwrap();
        assert_eq!(engine.render_to_string(&name, &document).unwrap(), "- a\n- b\n");
    }

    #[test]
    fn test_missing_template_file() {
        let temp_dir = tempdir().unwrap();
        let source = TemplateSource::File(temp_dir.path().join("main.tmpl"));
        let mut engine = TemplateEngine::new(&RenderOptions::default()).unwrap();
        let err = engine.load(&source).unwrap_err();
        assert!(matches!(err, TemplateError::Unavailable { .. }));
    }
}
