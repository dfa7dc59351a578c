// ABOUTME: Command implementations for the tpl CLI
// ABOUTME: Handles execution of csv, json, render, and version commands

use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::args::TemplateArgs;
use super::config::Config;
use crate::input::read_input;
use crate::normalize::{normalize, CsvOptions, InputFormat};
use crate::template::{render_template, TemplateSource};
use crate::value::Value;

/// Render CSV from a file or stdin
pub fn run_csv(
    input: Option<PathBuf>,
    template: TemplateArgs,
    delimiter: Option<char>,
    config: &Config,
) -> Result<()> {
    let options = config.csv_options(delimiter)?;
    let document = load_document(input.as_deref(), InputFormat::Csv, &options)?;
    render_to_stdout(&document, template, config)
}

/// Render JSON from a file or stdin
pub fn run_json(input: Option<PathBuf>, template: TemplateArgs, config: &Config) -> Result<()> {
    let document = load_document(input.as_deref(), InputFormat::Json, &CsvOptions::default())?;
    render_to_stdout(&document, template, config)
}

/// Render a data file whose format follows from its extension
pub fn run_render(
    input: PathBuf,
    template: TemplateArgs,
    delimiter: Option<char>,
    config: &Config,
) -> Result<()> {
    let format = InputFormat::from_path(&input)?;
    let options = config.csv_options(delimiter)?;
    let document = load_document(Some(&input), format, &options)?;
    render_to_stdout(&document, template, config)
}

/// Print build metadata
pub fn print_version() -> Result<()> {
    println!("{}", version_info());
    Ok(())
}

/// Build metadata as `Version=`, `Commit=` and `Date=` lines.
pub fn version_info() -> String {
    format!(
        "Version={}\nCommit={}\nDate={}",
        crate::VERSION,
        option_env!("TPL_COMMIT").unwrap_or("none"),
        option_env!("TPL_BUILD_DATE").unwrap_or("unknown"),
    )
}

/// Read and normalize one input document.
pub fn load_document(
    input: Option<&Path>,
    format: InputFormat,
    options: &CsvOptions,
) -> Result<Value> {
    match input {
        Some(path) => info!("Reading {} input from {}", format, path.display()),
        None => info!("Reading {} input from stdin", format),
    }

    let data = read_input(input).context("failed to setup input data")?;
    let document = normalize(format, &data, options).context("failed to create data map")?;
    debug!("Document root: {}", document.type_name());
    Ok(document)
}

/// Pick the root template: inline text, then `--template`, then the configured default.
pub fn resolve_template(template: TemplateArgs, config: &Config) -> Result<TemplateSource> {
    if let Some(text) = template.inline {
        return Ok(TemplateSource::Inline(text));
    }

    let path = template
        .template
        .unwrap_or_else(|| config.template.default_path.clone());
    if path.as_os_str().is_empty() {
        return Err(anyhow::anyhow!("no template file specified"));
    }
    Ok(TemplateSource::File(path))
}

/// Render a document into any writer, flushing whatever was produced even on failure.
pub fn render_document<W: Write>(
    document: &Value,
    template: TemplateArgs,
    config: &Config,
    writer: W,
) -> Result<()> {
    let options = config.render_options(template.partials.clone());
    let source = resolve_template(template, config)?;
    info!("Rendering template {}", source.name());

    let mut writer = BufWriter::new(writer);
    let rendered = render_template(&source, document, &options, &mut writer);
    writer.flush().context("failed to flush output")?;
    rendered.context("failed to run template")
}

fn render_to_stdout(document: &Value, template: TemplateArgs, config: &Config) -> Result<()> {
    let stdout = std::io::stdout();
    render_document(document, template, config, stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn inline(text: &str) -> TemplateArgs {
        TemplateArgs {
            inline: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_version_info_lines() {
        let info = version_info();
        let lines: Vec<&str> = info.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("Version={}", env!("CARGO_PKG_VERSION")));
        assert!(lines[1].starts_with("Commit="));
        assert!(lines[2].starts_with("Date="));
    }

    #[test]
    fn test_resolve_template_order() {
        let config = Config::default();

        let source = resolve_template(inline("{{a}}"), &config).unwrap();
        assert_eq!(source, TemplateSource::Inline("{{a}}".to_string()));

        let args = TemplateArgs {
            template: Some(PathBuf::from("custom.tmpl")),
            ..Default::default()
        };
        let source = resolve_template(args, &config).unwrap();
        assert_eq!(source, TemplateSource::File(PathBuf::from("custom.tmpl")));

        let source = resolve_template(TemplateArgs::default(), &config).unwrap();
        assert_eq!(source, TemplateSource::File(PathBuf::from("main.tmpl")));
    }

    #[test]
    fn test_resolve_template_empty_path() {
        let args = TemplateArgs {
            template: Some(PathBuf::new()),
            ..Default::default()
        };
        let err = resolve_template(args, &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "no template file specified");
    }

    #[test]
    fn test_load_and_render_csv_file() {
        let temp_dir = tempdir().unwrap();
        let data = temp_dir.path().join("people.csv");
        fs::write(&data, "name;age\nAlice;30\nBob;\n").unwrap();

        let config = Config::default();
        let options = config.csv_options(Some(';')).unwrap();
        let document = load_document(Some(&data), InputFormat::Csv, &options).unwrap();

        let mut output = Vec::new();
        render_document(
            &document,
            inline("{{#each this}}{{name}}:{{age}}\n{{/each}}"),
            &config,
            &mut output,
        )
        .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Alice:30\nBob:\n");
    }

    #[test]
    fn test_missing_input_file() {
        let temp_dir = tempdir().unwrap();
        let err = load_document(
            Some(&temp_dir.path().join("missing.json")),
            InputFormat::Json,
            &CsvOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "failed to setup input data");
    }

    #[test]
    fn test_malformed_json_input() {
        let temp_dir = tempdir().unwrap();
        let data = temp_dir.path().join("bad.json");
        fs::write(&data, "{not json").unwrap();

        let err = load_document(Some(&data), InputFormat::Json, &CsvOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to create data map");
    }

    #[test]
    fn test_render_failure_flushes_partial_output() {
        let mut output = Vec::new();
        let err = render_document(
            &Value::List(vec![]),
            inline("before {{div 1 0}}"),
            &Config::default(),
            &mut output,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "failed to run template");
        assert_eq!(String::from_utf8(output).unwrap(), "before ");
    }

    #[test]
    fn test_render_unsupported_extension() {
        let err = run_render(
            PathBuf::from("data.xml"),
            inline("{{this}}"),
            None,
            &Config::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "file type 'xml' not supported");
    }
}
