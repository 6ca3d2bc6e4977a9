use crate::error::Result;
use crate::models::*;

/// Decides which issue fields and expansions a search must request.
///
/// Both methods return a comma-joined list. An empty string means the source
/// should not restrict the projection at all and let the server decide.
pub trait IssueProjection: Send + Sync {
    /// Comma-joined issue field names (e.g., "key,status,updated")
    fn required_issue_fields(&self) -> String;

    /// Comma-joined expansions (e.g., "changelog")
    fn required_issue_expansions(&self) -> String;
}

/// Projection that requests nothing specific
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProjection;

impl IssueProjection for NoProjection {
    fn required_issue_fields(&self) -> String {
        String::new()
    }

    fn required_issue_expansions(&self) -> String {
        String::new()
    }
}

/// Projection backed by fixed lists, typically taken from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedProjection {
    pub fields: Vec<String>,
    pub expand: Vec<String>,
}

impl FixedProjection {
    pub fn new<F, E>(fields: F, expand: E) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            expand: expand.into_iter().map(Into::into).collect(),
        }
    }
}

fn join_non_blank(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

impl IssueProjection for FixedProjection {
    fn required_issue_fields(&self) -> String {
        join_non_blank(&self.fields)
    }

    fn required_issue_expansions(&self) -> String {
        join_non_blank(&self.expand)
    }
}

/// A tracker that can report issues changed within a time window.
///
/// Implementations perform exactly one remote exchange per call and never
/// loop over pages or retry; see [`crate::pagination`] for the caller side.
pub trait ChangeSource: Send + Sync {
    /// List the keys of all projects visible to the configured account
    fn list_all_projects(&self) -> Result<Vec<ProjectKey>>;

    /// Fetch one page of issues of `project_key` updated within `window`,
    /// ordered by ascending update time, starting at offset `start_at`
    fn get_changed_issues(
        &self,
        project_key: &str,
        start_at: u64,
        window: &DateWindow,
    ) -> Result<ChangedIssuesResult>;
}
