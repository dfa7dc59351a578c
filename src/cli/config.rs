// ABOUTME: Configuration management for the tpl application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::parse_delimiter;
use crate::normalize::CsvOptions;
use crate::template::RenderOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub csv: CsvConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_template_path")]
    pub default_path: PathBuf,
    #[serde(default)]
    pub strict_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_template_path() -> PathBuf {
    PathBuf::from("main.tmpl")
}

fn default_delimiter() -> char {
    ','
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            default_path: default_template_path(),
            strict_mode: false,
        }
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(anyhow::anyhow!(
                        "Configuration file not found: {}",
                        p.display()
                    ));
                }
                Some(p)
            }
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)?;
                Self::from_yaml(&contents)?
            }
            None => Config::default(),
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        // an empty file deserializes to unit, not to a mapping
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let possible_paths = [
            PathBuf::from("tpl.yaml"),
            PathBuf::from("tpl.yml"),
            PathBuf::from(".tpl.yaml"),
            PathBuf::from(".tpl.yml"),
        ];

        if let Some(path) = possible_paths.into_iter().find(|path| path.exists()) {
            return Some(path);
        }

        dirs::home_dir()
            .map(|home| home.join(".tpl").join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("TPL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TPL_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(path) = lookup("TPL_TEMPLATE") {
            self.template.default_path = PathBuf::from(path);
        }
        if let Some(strict) = lookup("TPL_STRICT") {
            self.template.strict_mode = strict.parse()?;
        }
        if let Some(delimiter) = lookup("TPL_CSV_DELIMITER") {
            let mut chars = delimiter.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => self.csv.delimiter = c,
                _ => {
                    return Err(anyhow::anyhow!(
                        "Invalid TPL_CSV_DELIMITER '{}'. Expected a single character",
                        delimiter
                    ))
                }
            }
        }
        Ok(())
    }

    /// CSV parser settings, with an optional command line override
    pub fn csv_options(&self, delimiter: Option<char>) -> Result<CsvOptions> {
        Ok(CsvOptions {
            delimiter: parse_delimiter(delimiter.unwrap_or(self.csv.delimiter))?,
        })
    }

    /// Render driver settings for the given partial files
    pub fn render_options(&self, partials: Vec<PathBuf>) -> RenderOptions {
        RenderOptions {
            strict_mode: self.template.strict_mode,
            partials,
        }
    }
}
