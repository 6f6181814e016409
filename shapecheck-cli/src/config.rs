//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `shapecheck.toml` files
//! and merging with command-line arguments.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CliResult, ConfigError};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "shapecheck.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report configuration.
    pub output: OutputConfig,
}

/// How reports are written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON array covering every document.
    Json,
}

/// Report configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format.
    pub format: OutputFormat,

    /// Whether text output is colored.
    pub color: bool,

    /// Whether text output lists only leaf issues.
    pub flatten: bool,

    /// Whether text output shows parse scores.
    pub show_scores: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            flatten: true,
            show_scores: false,
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path, `shapecheck.toml` in the current directory is used if
    /// present, and defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::not_found(path.to_path_buf()).into());
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(format) = args.format {
            config.output.format = format;
        }

        if let Some(color) = args.color {
            config.output.color = color;
        }

        if let Some(flatten) = args.flatten {
            config.output.flatten = flatten;
        }

        if let Some(show_scores) = args.show_scores {
            config.output.show_scores = show_scores;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# shapecheck configuration file

[output]
# Report format: "text" or "json"
format = "text"

# Color text output
color = true

# List only leaf issues ("path: message") instead of the issue tree
flatten = true

# Show the parse score of each issue
show_scores = false
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Format override.
    pub format: Option<OutputFormat>,

    /// Color override.
    pub color: Option<bool>,

    /// Flatten override.
    pub flatten: Option<bool>,

    /// Show scores override.
    pub show_scores: Option<bool>,
}
