use std::fmt;
use std::time::Duration;
use url::Url;

use crate::error::{JiraError, Result};
use crate::jql::JqlTimezone;

/// Path of the REST API root relative to the Jira base URL
pub const REST_API_PATH: &str = "rest/api/2/";

/// Default HTTP call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Turn a Jira base URL into its REST API root.
///
/// Returns `None` for absent or blank input. No URL validation happens here;
/// see [`ClientConfig::new`] for the checked variant.
pub fn prepare_api_url(base_url: Option<&str>) -> Option<String> {
    let base_url = base_url?.trim();
    if base_url.is_empty() {
        return None;
    }

    Some(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        REST_API_PATH
    ))
}

/// Basic Auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Credentials apply only when a non-blank username is given.
    /// The password is kept as-is, blank or not.
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        let username = username.filter(|u| !u.trim().is_empty())?;
        Some(Self {
            username: username.to_string(),
            password: password.unwrap_or_default().to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection and query settings of a [`crate::JiraClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_url: String,
    credentials: Option<Credentials>,
    timeout: Duration,
    /// Page size sent as `maxResults`; zero or negative lets the server choose
    pub max_issues_per_page: i32,
    /// Timezone query dates are rendered in. Read on every call, so changes
    /// apply to all subsequent queries.
    pub jql_timezone: JqlTimezone,
}

impl ClientConfig {
    /// Validate `base_url` and build a configuration from it.
    ///
    /// Fails with [`JiraError::Configuration`] if the URL is missing, blank,
    /// or not an absolute URL with a host.
    pub fn new(
        base_url: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let raw = base_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| JiraError::Configuration("Jira base URL must be set".to_string()))?;

        let parsed = Url::parse(raw).map_err(|e| {
            JiraError::Configuration(format!("Jira base URL '{}' is invalid: {}", raw, e))
        })?;
        if !parsed.has_host() {
            return Err(JiraError::Configuration(format!(
                "Jira base URL '{}' has no host",
                raw
            )));
        }

        let api_url = prepare_api_url(Some(raw))
            .ok_or_else(|| JiraError::Configuration("Jira base URL must be set".to_string()))?;

        Ok(Self {
            api_url,
            credentials: Credentials::from_parts(username, password),
            timeout,
            max_issues_per_page: 0,
            jql_timezone: JqlTimezone::default(),
        })
    }

    pub fn with_max_issues_per_page(mut self, max_issues_per_page: i32) -> Self {
        self.max_issues_per_page = max_issues_per_page;
        self
    }

    pub fn with_jql_timezone(mut self, timezone: JqlTimezone) -> Self {
        self.jql_timezone = timezone;
        self
    }

    /// Normalized REST API root, always ending with `/`
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn auth_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_JIRA_URL: &str = "https://issues.jboss.org";

    fn config(base_url: Option<&str>, username: Option<&str>, password: Option<&str>) -> Result<ClientConfig> {
        ClientConfig::new(base_url, username, password, Duration::from_millis(5000))
    }

    #[test]
    fn prepare_api_url_blank_is_none() {
        assert_eq!(prepare_api_url(None), None);
        assert_eq!(prepare_api_url(Some("")), None);
        assert_eq!(prepare_api_url(Some("  ")), None);
    }

    #[test]
    fn prepare_api_url_appends_rest_path_once() {
        assert_eq!(
            prepare_api_url(Some("http://issues.jboss.org")).as_deref(),
            Some("http://issues.jboss.org/rest/api/2/")
        );
        assert_eq!(
            prepare_api_url(Some("https://issues.jboss.org/")).as_deref(),
            Some("https://issues.jboss.org/rest/api/2/")
        );
        assert_eq!(
            prepare_api_url(Some(" https://example.org/jira// ")).as_deref(),
            Some("https://example.org/jira/rest/api/2/")
        );
    }

    #[test]
    fn new_rejects_missing_or_invalid_url() {
        for url in [None, Some(""), Some("  "), Some("nonsenseUrl"), Some("mailto:someone")] {
            let result = config(url, None, None);
            assert!(
                matches!(result, Err(JiraError::Configuration(_))),
                "expected configuration error for {:?}",
                url
            );
        }
    }

    #[test]
    fn new_normalizes_api_url() {
        let cfg = config(Some("http://issues.jboss.org"), None, None).unwrap();
        assert_eq!(cfg.api_url(), "http://issues.jboss.org/rest/api/2/");

        let cfg = config(Some(TEST_JIRA_URL), None, None).unwrap();
        assert_eq!(
            Some(cfg.api_url().to_string()),
            prepare_api_url(Some(TEST_JIRA_URL))
        );
        assert_eq!(cfg.timeout(), Duration::from_millis(5000));
        assert_eq!(cfg.max_issues_per_page, 0);
        assert_eq!(cfg.jql_timezone, JqlTimezone::Utc);
    }

    #[test]
    fn auth_requires_non_blank_username() {
        assert!(!config(Some(TEST_JIRA_URL), None, None).unwrap().auth_configured());
        assert!(!config(Some(TEST_JIRA_URL), Some(""), Some("pwd")).unwrap().auth_configured());
        assert!(!config(Some(TEST_JIRA_URL), Some("   "), Some("pwd")).unwrap().auth_configured());

        let cfg = config(Some(TEST_JIRA_URL), Some("uname"), Some("pwd")).unwrap();
        assert!(cfg.auth_configured());
        assert_eq!(cfg.credentials().unwrap().username, "uname");
        assert_eq!(cfg.credentials().unwrap().password, "pwd");
    }

    #[test]
    fn auth_keeps_username_as_given() {
        let cfg = config(Some(TEST_JIRA_URL), Some(" uname "), Some("pwd")).unwrap();
        assert_eq!(cfg.credentials().unwrap().username, " uname ");
    }

    #[test]
    fn auth_keeps_blank_password() {
        let cfg = config(Some(TEST_JIRA_URL), Some("uname"), None).unwrap();
        assert!(cfg.auth_configured());
        assert_eq!(cfg.credentials().unwrap().password, "");
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = Credentials::from_parts(Some("uname"), Some("secret")).unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("uname"));
        assert!(!debug.contains("secret"));
    }
}
