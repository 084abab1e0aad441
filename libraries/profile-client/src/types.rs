//! Types for backend API requests and responses.

use profile_core::{Session, SessionUser, UserId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default row table holding profiles.
pub const DEFAULT_PROFILES_TABLE: &str = "profiles";

/// Default bucket holding avatar images.
pub const DEFAULT_AVATAR_BUCKET: &str = "avatars";

/// Columns selected by a profile read.
pub(crate) const PROFILE_COLUMNS: &str = "full_name,username,website,avatar_url";

/// Configuration for connecting to the backend platform.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the project (e.g., "https://abc.example.co")
    pub url: String,
    /// Public API key sent as the `apikey` header on every request
    pub api_key: String,
    /// Current access token (if signed in)
    pub access_token: Option<String>,
    /// Refresh token issued with the access token
    pub refresh_token: Option<String>,
    /// User the access token was issued to, when known
    pub user_id: Option<UserId>,
    /// Row table holding profiles
    pub profiles_table: String,
    /// Bucket holding avatar images
    pub avatar_bucket: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl BackendConfig {
    /// Create a config with the URL and API key and default table/bucket names.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            access_token: None,
            refresh_token: None,
            user_id: None,
            profiles_table: DEFAULT_PROFILES_TABLE.to_string(),
            avatar_bucket: DEFAULT_AVATAR_BUCKET.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the profiles table name.
    pub fn with_profiles_table(mut self, table: impl Into<String>) -> Self {
        self.profiles_table = table.into();
        self
    }

    /// Override the avatar bucket name.
    pub fn with_avatar_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.avatar_bucket = bucket.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for the password grant.
#[derive(Debug, Serialize)]
pub struct PasswordGrantRequest {
    pub email: String,
    pub password: String,
}

/// User as reported by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response from a successful sign-in.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token validity in seconds
    #[serde(default)]
    pub expires_in: u64,
    pub user: UserResponse,
}

impl TokenResponse {
    /// Convert into the domain session.
    pub fn into_session(self) -> Session {
        Session {
            user: SessionUser {
                id: UserId::new(self.user.id),
                email: self.user.email,
            },
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Error body returned by the platform.
///
/// The auth, row and storage services each use different field names for the
/// human-readable message, so all of them are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiError {
    /// Best human-readable message in the body, or the raw body.
    pub fn message_from_body(body: &str) -> String {
        serde_json::from_str::<ApiError>(body)
            .ok()
            .and_then(|e| e.error_description.or(e.msg).or(e.message).or(e.error))
            .unwrap_or_else(|| body.to_string())
    }
}
