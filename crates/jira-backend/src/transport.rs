use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::{JiraError, Result};

/// Ordered query parameters of a REST call
pub type QueryParams = Vec<(String, String)>;

/// Performs GET calls against the Jira REST API root.
///
/// `operation` is relative to the API root (e.g., "search", "project").
/// Implementations fail on transport errors and non-success statuses and
/// return the raw response body otherwise.
pub trait RestTransport: Send + Sync {
    fn perform_get(&self, operation: &str, params: &[(String, String)]) -> Result<Vec<u8>>;
}

/// [`RestTransport`] over HTTP(S) using a blocking `ureq` agent
pub struct HttpTransport {
    agent: Agent,
    api_url: String,
    auth_header: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the API root, credentials and timeout of `config`
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            // Don't treat HTTP errors as errors - we'll handle them ourselves
            .http_status_as_error(false)
            .build()
            .into();

        let auth_header = config.credentials().map(|c| {
            let encoded = STANDARD.encode(format!("{}:{}", c.username, c.password));
            format!("Basic {}", encoded)
        });

        Self {
            agent,
            api_url: config.api_url().to_string(),
            auth_header,
        }
    }

    /// Full request URL for an operation and its query parameters
    fn request_url(&self, operation: &str, params: &[(String, String)]) -> String {
        build_request_url(&self.api_url, operation, params)
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        if status == 401 {
            return Err(JiraError::Unauthorized);
        }

        // Try to read error body for better error messages
        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        Err(JiraError::Api {
            status,
            message: error_message(status, body),
        })
    }
}

impl RestTransport for HttpTransport {
    fn perform_get(&self, operation: &str, params: &[(String, String)]) -> Result<Vec<u8>> {
        let url = self.request_url(operation, params);
        debug!(operation, url = %url, "jira GET");

        let mut request = self.agent.get(&url).header("Accept", "application/json");
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }

        let response = request.call()?;
        let mut response = self.check_response(response)?;
        let body = response.body_mut().read_to_vec()?;

        debug!(operation, bytes = body.len(), "jira response");
        Ok(body)
    }
}

pub(crate) fn build_request_url(api_url: &str, operation: &str, params: &[(String, String)]) -> String {
    let mut url = format!("{}{}", api_url, operation.trim_start_matches('/'));

    if !params.is_empty() {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
    }

    url
}

/// Extract a readable message from a Jira error body.
///
/// Jira error format: `{"errorMessages":["..."], "errors":{"field":"..."}}`
fn error_message(status: u16, body: String) -> String {
    let Ok(error_response) = serde_json::from_str::<serde_json::Value>(&body) else {
        return if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };
    };

    let mut messages = Vec::new();

    if let Some(errors) = error_response
        .get("errorMessages")
        .and_then(|e| e.as_array())
    {
        messages.extend(errors.iter().filter_map(|e| e.as_str()).map(str::to_string));
    }

    if let Some(errors) = error_response.get("errors").and_then(|e| e.as_object()) {
        for (field, msg) in errors {
            if let Some(s) = msg.as_str() {
                messages.push(format!("{}: {}", field, s));
            }
        }
    }

    if messages.is_empty() {
        body
    } else {
        messages.join("; ")
    }
}
