//! Profile form
//!
//! Holds a local, editable copy of the signed-in user's profile. The row
//! identifier always comes from the session; there is no way to edit it.

use crate::avatar::{AvatarUploader, AvatarView};
use crate::lock;
use crate::notification::{Notification, NotificationSlot, ToastView};
use crate::settings::UiSettings;
use chrono::Utc;
use profile_core::{
    Authenticator, AvatarPath, ObjectStore, ProfileError, ProfileFields, ProfileRecord,
    ProfileStore, Result, SelectedFile, Session,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::MutexGuard;
use tracing::{debug, error, info, warn};

const LOAD_FAILURE: &str = "Error loading user data!";
const UPDATE_SUCCESS: &str = "Profile updated!";
const UPDATE_FAILURE: &str = "Error updating the data!";
const SIGN_OUT_FAILURE: &str = "Error signing out!";

/// What a renderer draws for the profile form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFormView {
    /// Read-only, from the session
    pub email: Option<String>,
    pub full_name: String,
    pub username: String,
    pub website: String,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub avatar: AvatarView,
    pub toast: Option<ToastView>,
}

/// Serializable snapshot of the editable fields, for printing.
#[derive(Debug, Serialize)]
struct FieldsSnapshot<'a> {
    email: Option<&'a str>,
    #[serde(flatten)]
    fields: &'a ProfileFields,
}

#[derive(Debug, Default)]
struct FormInner {
    fields: ProfileFields,
    loading: bool,
}

/// Clears the loading flag when a request finishes or is dropped, then lets
/// the next request in.
struct LoadingGuard<'a> {
    inner: &'a Mutex<FormInner>,
    _turn: MutexGuard<'a, ()>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        lock(self.inner).loading = false;
    }
}

/// The account screen: profile fields, avatar and sign-out.
pub struct ProfileForm {
    session: Session,
    profiles: Arc<dyn ProfileStore>,
    auth: Arc<dyn Authenticator>,
    settings: UiSettings,
    avatar: AvatarUploader,
    inner: Mutex<FormInner>,
    /// Held for the whole of a load or submit
    requests: tokio::sync::Mutex<()>,
    toast: NotificationSlot,
}

impl ProfileForm {
    pub fn new(
        session: Session,
        profiles: Arc<dyn ProfileStore>,
        objects: Arc<dyn ObjectStore>,
        auth: Arc<dyn Authenticator>,
        settings: UiSettings,
    ) -> Self {
        let avatar = AvatarUploader::new(session.user_id().clone(), objects, settings.clone());

        Self {
            session,
            profiles,
            auth,
            settings,
            avatar,
            inner: Mutex::new(FormInner::default()),
            requests: tokio::sync::Mutex::new(()),
            toast: NotificationSlot::new(),
        }
    }

    /// Start a request, or refuse with `Busy` while another one is pending.
    fn begin(&self, operation: &'static str) -> Result<LoadingGuard<'_>> {
        match self.requests.try_lock() {
            Ok(turn) => Ok(self.enter(turn)),
            Err(_) => {
                debug!(user_id = %self.session.user_id(), operation, "Request pending, ignoring");
                Err(ProfileError::Busy(operation))
            }
        }
    }

    /// Start a request once the pending one, if any, has finished.
    async fn wait_turn(&self, operation: &'static str) -> LoadingGuard<'_> {
        if let Ok(turn) = self.requests.try_lock() {
            return self.enter(turn);
        }
        debug!(user_id = %self.session.user_id(), operation, "Waiting for pending request");
        let turn = self.requests.lock().await;
        self.enter(turn)
    }

    fn enter<'a>(&'a self, turn: MutexGuard<'a, ()>) -> LoadingGuard<'a> {
        lock(&self.inner).loading = true;
        LoadingGuard {
            inner: &self.inner,
            _turn: turn,
        }
    }

    /// Fetch the signed-in user's profile into the form.
    ///
    /// A missing row leaves every field empty without a notification. Any
    /// other failure also empties the fields and shows an error.
    pub async fn load(&self) -> Result<ProfileFields> {
        let user_id = self.session.user_id();
        let guard = self.begin("Profile load")?;

        debug!(user_id = %user_id, "Loading profile");
        let result = self.profiles.fetch_profile(user_id).await;

        let fields = match result {
            Ok(found) => {
                let fields = found.unwrap_or_default();
                if fields.is_empty() {
                    info!(user_id = %user_id, "No profile stored yet");
                } else {
                    info!(user_id = %user_id, "Profile loaded");
                }
                lock(&self.inner).fields = fields.clone();
                fields
            }
            Err(e) => {
                lock(&self.inner).fields = ProfileFields::default();
                drop(guard);

                error!(user_id = %user_id, error = %e, "Failed to load profile");
                self.toast.show(
                    Notification::error(LOAD_FAILURE),
                    self.settings.load_error_toast(),
                );
                self.avatar.resolve(None).await.ok();
                return Err(e);
            }
        };
        drop(guard);

        if let Err(e) = self.avatar.resolve(fields.avatar_url.as_ref()).await {
            debug!(user_id = %user_id, error = %e, "Avatar left as placeholder");
        }

        Ok(fields)
    }

    pub fn set_full_name(&self, value: impl Into<String>) {
        lock(&self.inner).fields.full_name = non_empty(value.into());
    }

    pub fn set_username(&self, value: impl Into<String>) {
        lock(&self.inner).fields.username = non_empty(value.into());
    }

    pub fn set_website(&self, value: impl Into<String>) {
        lock(&self.inner).fields.website = non_empty(value.into());
    }

    /// Upsert the current fields as the signed-in user's row.
    pub async fn submit(&self) -> Result<ProfileRecord> {
        let guard = self.begin("Profile update")?;
        self.save(guard, None).await
    }

    /// Write the row while `_guard` is held. `avatar` replaces the local
    /// reference first, so a load that finished in the meantime cannot undo it.
    async fn save(
        &self,
        _guard: LoadingGuard<'_>,
        avatar: Option<AvatarPath>,
    ) -> Result<ProfileRecord> {
        let record = {
            let mut inner = lock(&self.inner);
            if let Some(path) = avatar {
                inner.fields.avatar_url = Some(path);
            }
            ProfileRecord::new(self.session.user_id(), &inner.fields, Utc::now())
        };

        debug!(user_id = %record.id, "Submitting profile");
        match self.profiles.upsert_profile(&record).await {
            Ok(()) => {
                info!(user_id = %record.id, "Profile updated");
                self.toast.show(
                    Notification::success(UPDATE_SUCCESS),
                    self.settings.update_toast(),
                );
                Ok(record)
            }
            Err(e) => {
                error!(user_id = %record.id, error = %e, "Failed to update profile");
                self.toast.show(
                    Notification::error(UPDATE_FAILURE),
                    self.settings.update_toast(),
                );
                Err(e)
            }
        }
    }

    /// Upload a new avatar, then save it on the profile.
    ///
    /// On a successful upload the new reference replaces the local one and is
    /// submitted together with the other current fields, exactly once, while
    /// the new image is resolved for display. A load or submit still pending
    /// when the upload finishes is waited for rather than refused.
    pub async fn upload_avatar(&self, files: &[SelectedFile]) -> Result<ProfileRecord> {
        let path = self.avatar.upload(files).await?;
        lock(&self.inner).fields.avatar_url = Some(path.clone());

        let submit = async {
            let guard = self.wait_turn("Avatar update").await;
            self.save(guard, Some(path.clone())).await
        };
        let (submitted, resolved) = tokio::join!(submit, self.avatar.resolve(Some(&path)));
        if let Err(e) = resolved {
            debug!(path = %path, error = %e, "New avatar not displayed");
        }
        submitted
    }

    /// End the session with the auth service.
    pub async fn sign_out(&self) -> Result<()> {
        let user_id = self.session.user_id();

        match self.auth.sign_out(&self.session).await {
            Ok(()) => {
                info!(user_id = %user_id, "Signed out");
                Ok(())
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Sign-out failed");
                self.toast.show(
                    Notification::error(SIGN_OUT_FAILURE),
                    self.settings.auth_toast(),
                );
                Err(e)
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn fields(&self) -> ProfileFields {
        lock(&self.inner).fields.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.inner).loading
    }

    pub fn avatar(&self) -> &AvatarUploader {
        &self.avatar
    }

    /// The form's own notification slot. Avatar notifications live on
    /// `avatar().notifications()`.
    pub fn notifications(&self) -> &NotificationSlot {
        &self.toast
    }

    /// Fields as pretty JSON, with the session email.
    pub fn fields_json(&self) -> serde_json::Result<String> {
        let fields = self.fields();
        serde_json::to_string_pretty(&FieldsSnapshot {
            email: self.session.email(),
            fields: &fields,
        })
    }

    pub fn view(&self) -> ProfileFormView {
        let (fields, loading) = {
            let inner = lock(&self.inner);
            (inner.fields.clone(), inner.loading)
        };

        ProfileFormView {
            email: self.session.email().map(str::to_string),
            full_name: fields.full_name.unwrap_or_default(),
            username: fields.username.unwrap_or_default(),
            website: fields.website.unwrap_or_default(),
            submit_label: if loading { "Loading ..." } else { "Update" },
            submit_enabled: !loading,
            avatar: self.avatar.view(),
            toast: self.toast.view(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
