//! Command-line interface for typeprocess.
//!
//! This module provides the CLI structure for the `tpform` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, OutputFormat, RenderCommand, SubmitCommand};

/// tpform - Submit form values to a SharePoint list
///
/// Creates list items through the AddValidateUpdateItemUsingPath REST
/// endpoint and renders the form's welcome panel.
#[derive(Debug, Parser)]
#[command(name = "tpform")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a list item from form values
    Submit(SubmitCommand),

    /// Render the form's welcome panel as HTML
    Render(RenderCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use crate::logging::Verbosity;
    use crate::model::FormValue;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "tpform");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["tpform", "-q", "config", "path"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["tpform", "config", "path"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["tpform", "-v", "config", "path"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["tpform", "-vv", "config", "path"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_submit() {
        let cli = parse(&[
            "tpform",
            "submit",
            "--web-url",
            "https://contoso.sharepoint.com/sites/hr",
            "--list-url",
            "/sites/hr/Lists/Requests",
            "-f",
            "Title=Laptop",
            "-f",
            "Priority=High",
            "--format",
            "json",
        ]);

        let Command::Submit(cmd) = cli.command else {
            panic!("expected submit command");
        };
        assert_eq!(cmd.web_url.as_deref(), Some("https://contoso.sharepoint.com/sites/hr"));
        assert_eq!(cmd.list_url.as_deref(), Some("/sites/hr/Lists/Requests"));
        assert_eq!(
            cmd.fields,
            vec![FormValue::new("Title", "Laptop"), FormValue::new("Priority", "High")]
        );
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_submit_rejects_bad_field() {
        let result = Cli::try_parse_from(["tpform", "submit", "-f", "NoEquals"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_render() {
        let cli = parse(&["tpform", "render", "-d", "<b>hi</b>"]);
        assert!(matches!(
            cli.command,
            Command::Render(RenderCommand { ref description, output: None }) if description == "<b>hi</b>"
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["tpform", "-c", "/custom/config.toml", "config", "show"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Show { json: false })));
    }
}
