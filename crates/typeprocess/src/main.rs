//! `tpform` - CLI for typeprocess
//!
//! This binary submits form values to a SharePoint list and renders the
//! form's welcome panel.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tracing::info;

use typeprocess::cli::{Cli, Command, ConfigCommand, OutputFormat, RenderCommand, SubmitCommand};
use typeprocess::model::{created_item_id, exception_count};
use typeprocess::{
    init_logging, render_form, write_form, Config, FormProps, ListItemFormUpdateValue,
    ReqwestTransport, TypeProcessService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Submit(submit_cmd) => handle_submit(&config, &submit_cmd).await,
        Command::Render(render_cmd) => handle_render(&render_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_submit(config: &Config, cmd: &SubmitCommand) -> anyhow::Result<()> {
    let web_url = config.web_url(cmd.web_url.as_deref())?;
    let list_url = config.list_url(cmd.list_url.as_deref())?;
    let data = cmd.submission_data()?;

    let transport = ReqwestTransport::new(&config.http)?;
    let strings = config.string_table()?;
    let service = TypeProcessService::new(transport, strings);

    info!(%web_url, %list_url, fields = data.form_values.len(), "creating list item");
    let results = service
        .create_type_process(&web_url, &list_url, &data)
        .await?;

    print_results(&results, cmd.format)?;

    let rejected = exception_count(&results);
    if rejected > 0 {
        anyhow::bail!("{rejected} field(s) failed validation");
    }
    Ok(())
}

fn print_results(
    results: &[ListItemFormUpdateValue],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::Table => {
            if let Some(id) = created_item_id(results) {
                println!("Created item {id}");
                println!();
            }
            println!("{:<24} {:<32} {}", "FIELD", "VALUE", "STATUS");
            println!("{:-<24} {:-<32} {:-<6}", "", "", "");
            for value in results {
                let status = if value.has_exception() {
                    value.error_message().unwrap_or("error")
                } else {
                    "ok"
                };
                println!(
                    "{:<24} {:<32} {}",
                    value.field_name().unwrap_or_default(),
                    value.field_value().unwrap_or_default(),
                    status
                );
            }
        }
        OutputFormat::Plain => {
            for value in results {
                println!(
                    "{}={}",
                    value.field_name().unwrap_or_default(),
                    value.field_value().unwrap_or_default()
                );
            }
        }
    }
    Ok(())
}

fn handle_render(cmd: &RenderCommand) -> anyhow::Result<()> {
    let props = FormProps::new(cmd.description.as_str());
    match &cmd.output {
        Some(path) => {
            write_form(path, &props).with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{}", render_form(&props)),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Site]");
                println!(
                    "  Web URL:        {}",
                    config.site.web_url.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "  List URL:       {}",
                    config.site.list_url.as_deref().unwrap_or("(not set)")
                );
                println!();
                println!("[HTTP]");
                println!("  Timeout (s):    {}", config.http.timeout_secs);
                println!("  User agent:     {}", config.http.user_agent);
                println!(
                    "  Access token:   {}",
                    if config.http.access_token.is_some() { "set" } else { "not set" }
                );
                println!(
                    "  Request digest: {}",
                    if config.http.request_digest.is_some() { "set" } else { "not set" }
                );
                println!();
                println!("[Strings]");
                match &config.strings.path {
                    Some(path) => println!("  Overrides:      {}", path.display()),
                    None => println!("  Overrides:      (built-in)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)).and_then(|c| c.string_table().map(|_| ())) {
                Ok(()) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
