use crate::cli::OutputFormat;
use crate::output::output_list;
use anyhow::{Context, Result};
use changefeed_core::ChangeSource;

pub fn handle_projects(source: &dyn ChangeSource, format: OutputFormat) -> Result<()> {
    let projects = source
        .list_all_projects()
        .context("Failed to list projects")?;

    tracing::debug!(count = projects.len(), "listed projects");
    output_list(&projects, format)
}
