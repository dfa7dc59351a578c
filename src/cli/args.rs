// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the csv, json, render and version subcommands for tpl

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tpl")]
#[command(about = "Render CSV and JSON data through Handlebars templates")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest CSV data and render it through a template
    Csv {
        #[arg(help = "Input CSV file (reads stdin when omitted)")]
        input: Option<PathBuf>,

        #[command(flatten)]
        template: TemplateArgs,

        #[arg(short, long, help = "Field delimiter (single ASCII character)")]
        delimiter: Option<char>,
    },

    /// Ingest JSON data and render it through a template
    Json {
        #[arg(help = "Input JSON file (reads stdin when omitted)")]
        input: Option<PathBuf>,

        #[command(flatten)]
        template: TemplateArgs,
    },

    /// Render a data file, picking the format from its extension
    Render {
        #[arg(help = "Input file ending in .csv or .json")]
        input: PathBuf,

        #[command(flatten)]
        template: TemplateArgs,

        #[arg(short, long, help = "Field delimiter for CSV input")]
        delimiter: Option<char>,
    },

    /// Print version information
    Version,
}

/// Template selection shared by the rendering subcommands.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct TemplateArgs {
    #[arg(
        short,
        long,
        help = "Template root file path [default: main.tmpl]",
        conflicts_with = "inline"
    )]
    pub template: Option<PathBuf>,

    #[arg(long, help = "Template text to render instead of a file")]
    pub inline: Option<String>,

    #[arg(
        short,
        long = "partial",
        help = "Additional template file registered as a partial (repeatable)"
    )]
    pub partials: Vec<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Convert a delimiter argument into the byte the CSV parser expects.
pub fn parse_delimiter(delimiter: char) -> anyhow::Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(anyhow::anyhow!(
            "Invalid delimiter '{}'. Expected a single ASCII character",
            delimiter
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_command_defaults() {
        let args = Args::try_parse_from(["tpl", "csv", "data.csv"]).unwrap();
        match args.command {
            Commands::Csv {
                input,
                template,
                delimiter,
            } => {
                assert_eq!(input, Some(PathBuf::from("data.csv")));
                assert!(template.template.is_none());
                assert!(template.inline.is_none());
                assert!(template.partials.is_empty());
                assert!(delimiter.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!args.verbose);
    }

    #[test]
    fn test_verbose_after_subcommand() {
        let args = Args::try_parse_from(["tpl", "json", "-v", "-t", "out.tmpl"]).unwrap();
        assert!(args.verbose);
        match args.command {
            Commands::Json { input, template } => {
                assert!(input.is_none());
                assert_eq!(template.template, Some(PathBuf::from("out.tmpl")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_partials_repeat() {
        let args = Args::try_parse_from([
            "tpl", "render", "in.json", "-p", "a.hbs", "--partial", "b.hbs",
        ])
        .unwrap();
        match args.command {
            Commands::Render { template, .. } => {
                assert_eq!(
                    template.partials,
                    vec![PathBuf::from("a.hbs"), PathBuf::from("b.hbs")]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_inline_conflicts_with_template() {
        let result = Args::try_parse_from([
            "tpl", "json", "--inline", "{{a}}", "-t", "main.tmpl",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_requires_input() {
        assert!(Args::try_parse_from(["tpl", "render"]).is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(';').unwrap(), b';');
        assert_eq!(parse_delimiter('\t').unwrap(), b'\t');
        assert!(parse_delimiter('é').is_err());
    }
}
