use thiserror::Error;

/// Errors produced by the relay outside of the HTTP boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} must be set")]
    MissingConfig(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    /// Transport failure or non-success status from the Spotify API.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The Spotify API answered with something we could not use.
    #[error("unexpected upstream payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_config(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            name,
            reason: reason.into(),
        }
    }
}
