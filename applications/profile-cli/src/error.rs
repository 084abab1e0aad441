/// CLI error types
use profile_client::BackendError;
use profile_core::ProfileError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No avatar stored for this profile")]
    NoAvatar,

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
