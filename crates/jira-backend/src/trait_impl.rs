//! Implementation of changefeed-core traits for JiraClient

use changefeed_core::{ChangeSource, ChangedIssuesResult, ChangesError, DateWindow, ProjectKey, Result};

use crate::client::JiraClient;

impl ChangeSource for JiraClient {
    fn list_all_projects(&self) -> Result<Vec<ProjectKey>> {
        self.list_all_projects().map_err(ChangesError::from)
    }

    fn get_changed_issues(
        &self,
        project_key: &str,
        start_at: u64,
        window: &DateWindow,
    ) -> Result<ChangedIssuesResult> {
        self.get_changed_issues(project_key, start_at, window)
            .map_err(ChangesError::from)
    }
}
