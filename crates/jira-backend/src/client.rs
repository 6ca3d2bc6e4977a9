use std::sync::Arc;

use changefeed_core::{ChangedIssuesResult, DateWindow, IssueProjection, NoProjection, ProjectKey};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::jql::{JqlTimezone, build_changed_issues_jql, format_jql_date};
use crate::parse::{parse_changed_issues_response, parse_project_keys};
use crate::transport::{HttpTransport, QueryParams, RestTransport};

const SEARCH_OPERATION: &str = "search";
const PROJECT_OPERATION: &str = "project";

/// Jira REST API client for incremental change polling.
///
/// Each call performs a single request. Paging through a result set is the
/// caller's job: re-invoke [`JiraClient::get_changed_issues`] with
/// `start_at` set to the previous page's
/// [`ChangedIssuesResult::next_start_at`].
pub struct JiraClient {
    config: ClientConfig,
    transport: Box<dyn RestTransport>,
    projection: Arc<dyn IssueProjection>,
}

impl JiraClient {
    /// Create a client talking HTTP(S) to the configured Jira instance
    pub fn new(config: ClientConfig) -> Self {
        let transport = HttpTransport::new(&config);
        Self::with_transport(config, Box::new(transport))
    }

    /// Create a client on top of an arbitrary transport
    pub fn with_transport(config: ClientConfig, transport: Box<dyn RestTransport>) -> Self {
        Self {
            config,
            transport,
            projection: Arc::new(NoProjection),
        }
    }

    pub fn with_projection(mut self, projection: Arc<dyn IssueProjection>) -> Self {
        self.projection = projection;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replace the provider of requested issue fields and expansions
    pub fn set_projection(&mut self, projection: Arc<dyn IssueProjection>) {
        self.projection = projection;
    }

    /// Change the timezone used for JQL dates from now on
    pub fn set_jql_timezone(&mut self, timezone: JqlTimezone) {
        self.config.jql_timezone = timezone;
    }

    /// Change the requested page size; zero or negative lets the server decide
    pub fn set_max_issues_per_page(&mut self, max_issues_per_page: i32) {
        self.config.max_issues_per_page = max_issues_per_page;
    }

    // ==================== Query Building ====================

    /// Format an instant for JQL in the currently configured timezone
    pub fn format_query_date(&self, instant: Option<DateTime<Utc>>) -> Option<String> {
        instant.map(|i| format_jql_date(&i, self.config.jql_timezone))
    }

    /// JQL selecting issues of `project_key` updated within `window`
    pub fn build_changed_issues_query(&self, project_key: &str, window: &DateWindow) -> Result<String> {
        build_changed_issues_jql(
            project_key,
            window.updated_after,
            window.updated_before,
            self.config.jql_timezone,
        )
    }

    /// Parameters of the `search` call for one page of changed issues.
    ///
    /// `fields`, `expand` and `maxResults` are left out entirely when there
    /// is nothing to restrict, so the server defaults apply.
    pub fn changed_issues_search_params(
        &self,
        project_key: &str,
        start_at: u64,
        window: &DateWindow,
    ) -> Result<QueryParams> {
        let mut params = vec![(
            "jql".to_string(),
            self.build_changed_issues_query(project_key, window)?,
        )];

        let fields = self.projection.required_issue_fields();
        if !fields.is_empty() {
            params.push(("fields".to_string(), fields));
        }

        let expand = self.projection.required_issue_expansions();
        if !expand.is_empty() {
            params.push(("expand".to_string(), expand));
        }

        if self.config.max_issues_per_page > 0 {
            params.push((
                "maxResults".to_string(),
                self.config.max_issues_per_page.to_string(),
            ));
        }

        params.push(("startAt".to_string(), start_at.to_string()));
        Ok(params)
    }

    // ==================== Issue Operations ====================

    /// Fetch the raw `search` response for one page of changed issues
    pub fn fetch_changed_issues_page(
        &self,
        project_key: &str,
        start_at: u64,
        window: &DateWindow,
    ) -> Result<Vec<u8>> {
        let params = self.changed_issues_search_params(project_key, start_at, window)?;
        debug!(project = project_key, start_at, "fetching changed issues page");
        self.transport.perform_get(SEARCH_OPERATION, &params)
    }

    /// Fetch and decode one page of issues changed within `window`
    pub fn get_changed_issues(
        &self,
        project_key: &str,
        start_at: u64,
        window: &DateWindow,
    ) -> Result<ChangedIssuesResult> {
        let body = self.fetch_changed_issues_page(project_key, start_at, window)?;
        let result = parse_changed_issues_response(&body)?;
        debug!(
            project = project_key,
            start_at = result.start_at,
            returned = result.issues_count(),
            total = result.total,
            "changed issues page"
        );
        Ok(result)
    }

    // ==================== Project Operations ====================

    /// List the keys of all projects visible to the configured account
    pub fn list_all_projects(&self) -> Result<Vec<ProjectKey>> {
        let body = self.transport.perform_get(PROJECT_OPERATION, &[])?;
        parse_project_keys(&body)
    }
}
