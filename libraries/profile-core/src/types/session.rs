/// Authenticated session types
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The user a session was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Unique user identifier
    pub id: UserId,

    /// Sign-in email, when the auth service reports one
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session.
///
/// Tokens are redacted from the `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Owner of the session
    pub user: SessionUser,

    /// Bearer token for authenticated requests
    pub access_token: String,

    /// Token for obtaining a new access token
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Access token validity in seconds
    #[serde(default)]
    pub expires_in: u64,
}

impl Session {
    /// Identifier of the signed-in user
    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// Email of the signed-in user, if known
    pub fn email(&self) -> Option<&str> {
        self.user.email.as_deref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
