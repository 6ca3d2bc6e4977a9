//! Decoding of Jira search and project-listing responses.

use changefeed_core::{ChangedIssuesResult, ProjectKey};
use serde::Deserialize;

use crate::error::{JiraError, Result};

/// Envelope of a `search` response. Issues stay raw JSON; interpreting them
/// is up to whoever indexes them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEnvelope {
    start_at: u64,
    max_results: u64,
    total: u64,
    issues: Option<Vec<serde_json::Value>>,
}

/// Entry of a `project` listing; everything except the key is ignored
#[derive(Debug, Deserialize)]
struct ProjectEntry {
    key: String,
}

/// Parse a `search` response body into one page of changed issues
pub fn parse_changed_issues_response(body: &[u8]) -> Result<ChangedIssuesResult> {
    let envelope: SearchEnvelope = serde_json::from_slice(body).map_err(|e| {
        JiraError::MalformedResponse(format!("Invalid search response: {}", e))
    })?;

    Ok(ChangedIssuesResult::new(
        envelope.start_at,
        envelope.max_results,
        envelope.total,
        envelope.issues.unwrap_or_default(),
    ))
}

/// Parse a `project` listing body into project keys, in server order
pub fn parse_project_keys(body: &[u8]) -> Result<Vec<ProjectKey>> {
    let projects: Vec<ProjectEntry> = serde_json::from_slice(body).map_err(|e| {
        JiraError::MalformedResponse(format!("Invalid project list response: {}", e))
    })?;

    Ok(projects.into_iter().map(|p| ProjectKey::from(p.key)).collect())
}
