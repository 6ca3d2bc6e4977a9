use crate::cli::{OutputFormat, WindowArgs};
use crate::output::{output_list, output_result};
use anyhow::{Context, Result};
use changefeed_core::{fetch_all_changed_issues, ChangeSource, DateWindow};
use jira_backend::{build_changed_issues_jql, JqlTimezone};

impl WindowArgs {
    pub fn date_window(&self) -> DateWindow {
        DateWindow::new(self.after, self.before)
    }
}

pub struct ChangesRequest<'a> {
    pub project: &'a str,
    pub window: DateWindow,
    pub start_at: u64,
    pub all: bool,
    pub limit: Option<usize>,
}

pub fn handle_changes(
    source: &dyn ChangeSource,
    request: &ChangesRequest<'_>,
    format: OutputFormat,
) -> Result<()> {
    if request.all {
        let issues =
            fetch_all_changed_issues(source, request.project, &request.window, request.limit)
                .with_context(|| {
                    format!("Failed to fetch changed issues of '{}'", request.project)
                })?;

        tracing::debug!(count = issues.len(), project = request.project, "fetched all changed issues");
        return output_list(&issues, format);
    }

    let page = source
        .get_changed_issues(request.project, request.start_at, &request.window)
        .with_context(|| format!("Failed to fetch changed issues of '{}'", request.project))?;

    output_result(&page, format)
}

/// Print the JQL without contacting the server
pub fn handle_jql(
    project: &str,
    window: &DateWindow,
    timezone: JqlTimezone,
    format: OutputFormat,
) -> Result<()> {
    let jql = build_changed_issues_jql(
        project,
        window.updated_after,
        window.updated_before,
        timezone,
    )
    .context("Failed to build JQL")?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({ "jql": jql, "timezone": timezone.to_string() });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => println!("{}", jql),
    }
    Ok(())
}
