//! Collaborator trait implementations for `BackendClient`.
//!
//! Transport errors are folded into the `ProfileError` variant of the
//! operation that raised them.
//!
//! Row and object requests carry the token stored on the client, not the
//! token of the `Session` a component was built with. Build components on the
//! session this client signed in. A profile write for any other user is
//! refused before it is sent.

use crate::client::BackendClient;
use crate::error::BackendError;
use async_trait::async_trait;
use profile_core::{
    Authenticator, AvatarPath, ObjectStore, ProfileError, ProfileFields, ProfileRecord,
    ProfileStore, SelectedFile, Session, StoredObject, UserId,
};

fn describe(e: &BackendError) -> String {
    match e {
        BackendError::AuthFailed(msg) => msg.clone(),
        BackendError::ServerError { message, .. } if !message.is_empty() => message.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ProfileStore for BackendClient {
    async fn fetch_profile(&self, id: &UserId) -> profile_core::Result<Option<ProfileFields>> {
        let handle = self
            .profiles()
            .await
            .map_err(|e| ProfileError::fetch(describe(&e)))?;

        handle
            .client()
            .fetch(id)
            .await
            .map_err(|e| ProfileError::fetch(describe(&e)))
    }

    async fn upsert_profile(&self, record: &ProfileRecord) -> profile_core::Result<()> {
        if let Some(owner) = self.signed_in_user().await {
            if owner != record.id {
                return Err(ProfileError::upsert(format!(
                    "Signed in as {owner}, refusing to write profile {}",
                    record.id
                )));
            }
        }

        let handle = self
            .profiles()
            .await
            .map_err(|e| ProfileError::upsert(describe(&e)))?;

        handle
            .client()
            .upsert(record)
            .await
            .map_err(|e| ProfileError::upsert(describe(&e)))
    }
}

#[async_trait]
impl ObjectStore for BackendClient {
    async fn download(&self, path: &AvatarPath) -> profile_core::Result<StoredObject> {
        let handle = self
            .storage()
            .await
            .map_err(|e| ProfileError::download(describe(&e)))?;

        handle
            .client()
            .download(path)
            .await
            .map_err(|e| ProfileError::download(describe(&e)))
    }

    async fn upload(&self, path: &AvatarPath, file: &SelectedFile) -> profile_core::Result<()> {
        let handle = self
            .storage()
            .await
            .map_err(|e| ProfileError::upload(describe(&e)))?;

        handle
            .client()
            .upload(path, file)
            .await
            .map_err(|e| ProfileError::upload(describe(&e)))
    }
}

#[async_trait]
impl Authenticator for BackendClient {
    async fn sign_in(&self, email: &str, password: &str) -> profile_core::Result<Session> {
        BackendClient::sign_in(self, email, password)
            .await
            .map(|token| token.into_session())
            .map_err(|e| ProfileError::auth(describe(&e)))
    }

    async fn sign_out(&self, session: &Session) -> profile_core::Result<()> {
        self.revoke(&session.access_token)
            .await
            .map_err(|e| ProfileError::auth(describe(&e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_prefers_server_message() {
        let e = BackendError::ServerError {
            status: 500,
            message: "relation \"profiles\" does not exist".into(),
        };
        assert_eq!(describe(&e), "relation \"profiles\" does not exist");

        let e = BackendError::AuthFailed("Invalid login credentials".into());
        assert_eq!(describe(&e), "Invalid login credentials");

        assert_eq!(describe(&BackendError::AuthRequired), "Authentication required");
    }
}
