//! Core error types for Profile Account

use thiserror::Error;

/// Result type alias using `ProfileError`
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Error taxonomy for profile and avatar operations.
///
/// Each variant names the operation that failed, not the transport detail.
/// Backend implementations convert their own errors into the variant matching
/// the trait method that raised them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Profile read failed for a reason other than "not found"
    #[error("Failed to load profile: {0}")]
    Fetch(String),

    /// Profile write failed
    #[error("Failed to update profile: {0}")]
    Upsert(String),

    /// Avatar object could not be downloaded
    #[error("Failed to download avatar: {0}")]
    Download(String),

    /// Avatar object could not be uploaded
    #[error("Failed to upload avatar: {0}")]
    Upload(String),

    /// Caller input rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// Sign-in or sign-out failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Another request of the same kind is still pending
    #[error("{0} already in progress")]
    Busy(&'static str),
}

impl ProfileError {
    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create an upsert error
    pub fn upsert(msg: impl Into<String>) -> Self {
        Self::Upsert(msg.into())
    }

    /// Create a download error
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    /// Create an upload error
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Whether this error was raised before touching the network.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Busy(_))
    }
}
