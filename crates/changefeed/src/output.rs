use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use changefeed_core::{ChangedIssuesResult, ProjectKey};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render_result(result, format)?);
    Ok(())
}

pub fn output_list<T: Serialize + Displayable>(items: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json(&items)?),
        OutputFormat::Text => {
            for item in items {
                println!("{}", item.display());
            }
        }
    }
    Ok(())
}

fn render_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(result),
        OutputFormat::Text => Ok(result.display()),
    }
}

fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: error_code(err).to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err).unwrap_or_else(|_| {
                format!(r#"{{"error": true, "message": "{}"}}"#, err)
            })
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

/// Stable machine-readable code for the underlying library error
fn error_code(err: &anyhow::Error) -> &'static str {
    use changefeed_core::ChangesError;
    use jira_backend::JiraError;

    if let Some(err) = err.downcast_ref::<ChangesError>() {
        return match err {
            ChangesError::Configuration(_) => "configuration",
            ChangesError::InvalidArgument(_) => "invalid_argument",
            ChangesError::Unauthorized => "unauthorized",
            ChangesError::Api { .. } => "api",
            ChangesError::Transport(_) => "transport",
            ChangesError::MalformedResponse(_) => "malformed_response",
        };
    }

    match err.downcast_ref::<JiraError>() {
        Some(JiraError::Configuration(_)) => "configuration",
        Some(JiraError::InvalidArgument(_)) => "invalid_argument",
        Some(JiraError::Unauthorized) => "unauthorized",
        Some(JiraError::Api { .. }) => "api",
        Some(JiraError::Http(_)) | Some(JiraError::Io(_)) => "transport",
        Some(JiraError::MalformedResponse(_)) => "malformed_response",
        None => "error",
    }
}

pub trait Displayable {
    fn display(&self) -> String;
}

impl Displayable for ProjectKey {
    fn display(&self) -> String {
        self.as_str().cyan().bold().to_string()
    }
}

impl Displayable for Value {
    fn display(&self) -> String {
        let key = self["key"].as_str().unwrap_or("?");
        let mut output = key.cyan().bold().to_string();

        let fields = &self["fields"];
        if let Some(summary) = fields["summary"].as_str() {
            output.push_str(&format!(" - {}", summary.white().bold()));
        }
        if let Some(updated) = fields["updated"].as_str() {
            output.push_str(&format!("\n  {}: {}", "Updated".dimmed(), updated.dimmed()));
        }
        if let Some(status) = fields["status"]["name"].as_str() {
            output.push_str(&format!("\n  {}: {}", "Status".dimmed(), status));
        }

        output
    }
}

impl Displayable for ChangedIssuesResult {
    fn display(&self) -> String {
        if self.issues.is_empty() {
            return format!(
                "No changed issues at offset {} ({} total)",
                self.start_at, self.total
            )
            .dimmed()
            .to_string();
        }

        let mut output = format!(
            "{} {}-{} of {}",
            "Issues".dimmed(),
            self.start_at.saturating_add(1),
            self.next_start_at(),
            self.total
        );
        for issue in &self.issues {
            output.push('\n');
            output.push_str(&issue.display());
        }
        if !self.is_last_page() {
            output.push_str(&format!(
                "\n{}",
                format!("More results: --start-at {}", self.next_start_at()).dimmed()
            ));
        }

        output
    }
}
