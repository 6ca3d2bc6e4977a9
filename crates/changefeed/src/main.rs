mod cli;
mod color;
mod commands;
mod config;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands, OutputFormat};
use commands::changes::ChangesRequest;
use config::Config;
use jira_backend::JiraClient;
use output::output_error;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    color::init(cli.color);
    logging::init(cli.verbose);

    let format = cli.format;
    if let Err(e) = run(cli) {
        output_error(&e, format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<()> {
    // Commands that never contact the server
    match &cli.command {
        Commands::Completions { shell } => {
            Cli::generate_completions(*shell);
            return Ok(());
        }
        Commands::Config { action } => {
            return handle_config(action, &cli);
        }
        _ => {}
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_with_cli(&cli);

    if let Commands::Jql { project, window } = &cli.command {
        return commands::changes::handle_jql(
            project,
            &window.date_window(),
            config.jql_timezone()?,
            cli.format,
        );
    }

    config.validate()?;
    let client_config = config.client_config()?;
    tracing::debug!(api_url = client_config.api_url(), "using Jira API");

    let client = JiraClient::new(client_config).with_projection(Arc::new(config.projection()));

    match &cli.command {
        Commands::Projects => commands::projects::handle_projects(&client, cli.format),
        Commands::Changes {
            project,
            window,
            start_at,
            all,
            limit,
        } => {
            let request = ChangesRequest {
                project,
                window: window.date_window(),
                start_at: *start_at,
                all: *all,
                limit: *limit,
            };
            commands::changes::handle_changes(&client, &request, cli.format)
        }
        Commands::Jql { .. } | Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}

fn handle_config(action: &ConfigCommands, cli: &Cli) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let mut config = Config::load(cli.config.as_deref())?;
            config.merge_with_cli(cli);
            let redacted = config.redacted();

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&redacted)?);
                }
                OutputFormat::Text => {
                    let text = toml::to_string_pretty(&redacted)?;
                    if text.trim().is_empty() {
                        println!("No configuration set.");
                    } else {
                        print!("{}", text);
                    }
                }
            }
            Ok(())
        }
        ConfigCommands::Path => {
            let paths = config::config_paths(cli.config.as_deref());
            match cli.format {
                OutputFormat::Json => {
                    let entries: Vec<_> = paths
                        .iter()
                        .map(|p| serde_json::json!({ "path": p.display().to_string(), "exists": p.exists() }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                OutputFormat::Text => {
                    for path in paths {
                        let marker = if path.exists() { "" } else { " (missing)" };
                        println!("{}{}", path.display(), marker);
                    }
                }
            }
            Ok(())
        }
    }
}
