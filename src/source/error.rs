use reqwest::StatusCode;
use thiserror::Error;

/// Why a fetch produced no items.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not complete (DNS, connect, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("malformed listing: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload parsed but a post in it is unusable.
    #[error("malformed post {id:?}: {reason}")]
    InvalidPost { id: String, reason: &'static str },
}

/// Coarse classification used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    BadResponse,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::Status(_) | FetchError::Decode(_) | FetchError::InvalidPost { .. } => {
                FetchErrorKind::BadResponse
            }
        }
    }
}
