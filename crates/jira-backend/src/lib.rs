pub mod client;
pub mod config;
pub mod error;
pub mod jql;
pub mod parse;
pub mod transport;
mod trait_impl;


pub use client::JiraClient;
pub use config::{prepare_api_url, ClientConfig, Credentials, DEFAULT_TIMEOUT, REST_API_PATH};
pub use error::{JiraError, Result};
pub use jql::{build_changed_issues_jql, format_jql_date, JqlTimezone};
pub use parse::{parse_changed_issues_response, parse_project_keys};
pub use transport::{HttpTransport, QueryParams, RestTransport};

// Re-export changefeed-core types for convenience
pub use changefeed_core::{
    ChangeSource, ChangedIssuesResult, ChangesError, DateWindow, IssueProjection, ProjectKey,
};
