//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::error::{Error, Result};
use crate::model::{FormValue, SubmissionData};

/// Submit command arguments.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Absolute URL of the site (defaults to `site.web_url` from config)
    #[arg(short, long)]
    pub web_url: Option<String>,

    /// Server-relative URL of the list (defaults to `site.list_url` from config)
    #[arg(short, long)]
    pub list_url: Option<String>,

    /// JSON file containing `{"formValues": [{"FieldName": ..., "FieldValue": ...}]}`
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Field value as NAME=VALUE (repeatable, appended after --data values)
    #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<FormValue>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl SubmitCommand {
    /// Collect the form values from `--data` and `--field`, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be read or parsed.
    pub fn submission_data(&self) -> Result<SubmissionData> {
        let mut data = match &self.data {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&raw)?
            }
            None => SubmissionData::default(),
        };
        data.form_values.extend(self.fields.iter().cloned());
        Ok(data)
    }
}

fn parse_field(raw: &str) -> std::result::Result<FormValue, String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok(FormValue::new(name.trim(), value)),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

/// Render command arguments.
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// Description shown in the panel (HTML is escaped)
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Write the markup to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
