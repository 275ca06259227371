use thiserror::Error;

/// Failures surfaced by the relay and the update reader.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A required request field was missing or empty.
    #[error("{0}")]
    InvalidInput(String),

    /// Telegram answered, but reported a failure in its own envelope.
    #[error("{0}")]
    Upstream(String),

    /// Telegram could not be reached, or its reply was not valid JSON.
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.to_string())
    }
}
