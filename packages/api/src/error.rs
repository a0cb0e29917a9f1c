use thiserror::Error;

/// Failure talking to the portal backend.
///
/// `Clone` so scripted test doubles can hand out the same error more than once.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    /// The backend rejected the bearer token (HTTP 401).
    #[error("credential rejected by the backend")]
    Unauthorized,
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a response status onto the error taxonomy. `None` for 2xx.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 => Some(Self::Unauthorized),
            _ => Some(Self::Status { status }),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
