//! Collaborator traits for Profile Account
//!
//! The UI components only ever talk to the backend through these traits, so
//! a test can substitute an in-memory fake for the HTTP client.

use crate::error::Result;
use crate::types::{AvatarPath, ProfileFields, ProfileRecord, SelectedFile, Session, StoredObject, UserId};
use async_trait::async_trait;

/// Row storage for user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read the editable fields of the profile owned by `id`.
    ///
    /// Returns `Ok(None)` when no row exists. Any other failure is
    /// `ProfileError::Fetch`.
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<ProfileFields>>;

    /// Insert the record, or replace the existing row with the same id.
    ///
    /// Failures are `ProfileError::Upsert`.
    async fn upsert_profile(&self, record: &ProfileRecord) -> Result<()>;
}

/// Binary object storage for avatar images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object stored at `path`.
    ///
    /// Failures are `ProfileError::Download`.
    async fn download(&self, path: &AvatarPath) -> Result<StoredObject>;

    /// Store `file` at `path`.
    ///
    /// Fails with `ProfileError::Upload` if the path is already taken or the
    /// transfer fails.
    async fn upload(&self, path: &AvatarPath, file: &SelectedFile) -> Result<()>;
}

/// Session issuance.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// End the given session.
    async fn sign_out(&self, session: &Session) -> Result<()>;
}
