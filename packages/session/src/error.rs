use thiserror::Error;

/// Errors surfaced by the session layer.
///
/// Most of the layer never returns these: profile and notification failures
/// degrade to safe defaults. Only credential validation, login, storage
/// backends and config parsing report errors to their caller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Exactly one of token and user id was supplied.
    #[error("invalid credential: {0}")]
    InvalidCredential(&'static str),
    #[error("credential storage error: {0}")]
    Storage(String),
    #[error("invalid portal config: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Api(#[from] api::ApiError),
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}
