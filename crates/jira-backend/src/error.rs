use changefeed_core::ChangesError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JiraError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl JiraError {
    /// True for failures to obtain a successful response from the server
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            JiraError::Http(_) | JiraError::Io(_) | JiraError::Unauthorized | JiraError::Api { .. }
        )
    }
}

impl From<serde_json::Error> for JiraError {
    fn from(err: serde_json::Error) -> Self {
        JiraError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JiraError>;

impl From<JiraError> for ChangesError {
    fn from(err: JiraError) -> Self {
        match err {
            JiraError::Configuration(msg) => ChangesError::Configuration(msg),
            JiraError::InvalidArgument(msg) => ChangesError::InvalidArgument(msg),
            JiraError::Http(e) => ChangesError::Transport(e.to_string()),
            JiraError::Io(e) => ChangesError::Transport(e.to_string()),
            JiraError::Unauthorized => ChangesError::Unauthorized,
            JiraError::Api { status, message } => ChangesError::Api { status, message },
            JiraError::MalformedResponse(msg) => ChangesError::MalformedResponse(msg),
        }
    }
}
