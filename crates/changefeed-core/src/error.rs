use thiserror::Error;

/// Errors surfaced by any change source
#[derive(Error, Debug)]
pub enum ChangesError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ChangesError {
    /// True when the remote side could not be reached or refused the call,
    /// as opposed to answering with something unusable.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChangesError::Unauthorized | ChangesError::Api { .. } | ChangesError::Transport(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ChangesError>;
