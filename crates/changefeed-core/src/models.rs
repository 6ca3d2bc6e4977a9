use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key identifying a project on the tracker (e.g., "ORG")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectKey(String);

impl ProjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ProjectKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for ProjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ProjectKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProjectKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Update-time window used to select changed issues.
///
/// Both bounds are inclusive. Either may be absent; with both absent no time
/// filter is applied at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub updated_after: Option<DateTime<Utc>>,
    pub updated_before: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn new(
        updated_after: Option<DateTime<Utc>>,
        updated_before: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            updated_after,
            updated_before,
        }
    }

    /// Window with no time restriction
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Open-ended window starting at the last successful poll
    pub fn since(updated_after: DateTime<Utc>) -> Self {
        Self {
            updated_after: Some(updated_after),
            updated_before: None,
        }
    }

    pub fn until(mut self, updated_before: DateTime<Utc>) -> Self {
        self.updated_before = Some(updated_before);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.updated_after.is_none() && self.updated_before.is_none()
    }
}

/// One page of issues changed within a [`DateWindow`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedIssuesResult {
    /// Server-reported offset of the first returned issue
    pub start_at: u64,
    /// Page size the server actually applied
    pub max_results: u64,
    /// Total matching issues across all pages
    pub total: u64,
    /// Raw issue objects, in server order
    pub issues: Vec<serde_json::Value>,
}

impl ChangedIssuesResult {
    pub fn new(start_at: u64, max_results: u64, total: u64, issues: Vec<serde_json::Value>) -> Self {
        Self {
            start_at,
            max_results,
            total,
            issues,
        }
    }

    pub fn issues_count(&self) -> usize {
        self.issues.len()
    }

    /// Offset to request for the page following this one
    pub fn next_start_at(&self) -> u64 {
        self.start_at.saturating_add(self.issues.len() as u64)
    }

    /// Whether a caller paging through results should stop after this page.
    ///
    /// An empty page ends the sweep even if `total` claims more issues exist,
    /// so a server that under-delivers cannot cause an endless loop.
    pub fn is_last_page(&self) -> bool {
        self.issues.is_empty() || self.next_start_at() >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn page(start_at: u64, total: u64, count: usize) -> ChangedIssuesResult {
        let issues = (0..count)
            .map(|i| json!({ "key": format!("ORG-{}", start_at as usize + i) }))
            .collect();
        ChangedIssuesResult::new(start_at, 10, total, issues)
    }

    #[test]
    fn next_start_at_advances_by_issue_count() {
        let result = page(5, 50, 3);
        assert_eq!(result.next_start_at(), 8);
        assert_eq!(result.issues_count(), 3);
    }

    #[test]
    fn last_page_when_total_reached() {
        assert!(!page(0, 25, 10).is_last_page());
        assert!(!page(10, 25, 10).is_last_page());
        assert!(page(20, 25, 5).is_last_page());
    }

    #[test]
    fn offset_near_max_does_not_overflow() {
        let result = ChangedIssuesResult::new(u64::MAX, 10, 5, vec![json!({})]);
        assert_eq!(result.next_start_at(), u64::MAX);
        assert!(result.is_last_page());
    }

    #[test]
    fn empty_page_is_last_even_if_total_disagrees() {
        assert!(page(20, 30, 0).is_last_page());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let value = serde_json::to_value(page(0, 1, 1)).unwrap();
        assert_eq!(value["startAt"], 0);
        assert_eq!(value["maxResults"], 10);
        assert_eq!(value["total"], 1);
        assert_eq!(value["issues"][0]["key"], "ORG-0");
    }

    #[test]
    fn date_window_builders() {
        let after = Utc.with_ymd_and_hms(2012, 8, 10, 22, 52, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2012, 8, 10, 22, 55, 0).unwrap();

        assert!(DateWindow::unbounded().is_unbounded());

        let window = DateWindow::since(after).until(before);
        assert_eq!(window, DateWindow::new(Some(after), Some(before)));
        assert!(!window.is_unbounded());
    }

    #[test]
    fn project_key_compares_with_str() {
        let key = ProjectKey::from("ORG");
        assert_eq!(key, "ORG");
        assert_eq!(key.to_string(), "ORG");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"ORG\"");
    }
}
