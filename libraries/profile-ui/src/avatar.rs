//! Avatar uploader
//!
//! Resolves the stored avatar reference into a displayable image and uploads
//! newly selected files.
//!
//! ```text
//!          resolve(ref)              download done / failed
//!   Idle ───────────────▶ Resolving ───────────────────────▶ Idle
//!     │
//!     │ upload(files)                upload done / failed
//!     └───────────────▶ Uploading ─────────────────────────▶ Idle
//! ```
//!
//! Only one upload runs at a time: a second `upload` while `Uploading` is
//! rejected with `ProfileError::Busy` before any network call.

use crate::lock;
use crate::notification::{Notification, NotificationSlot, ToastView};
use crate::settings::UiSettings;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use profile_core::{AvatarPath, ObjectStore, ProfileError, Result, SelectedFile, StoredObject, UserId};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const UPLOAD_SUCCESS: &str = "Avatar uploaded successfully!";
const UPLOAD_FAILURE: &str = "Error uploading avatar!";
const DOWNLOAD_FAILURE: &str = "Error downloading avatar!";
const NO_FILE_SELECTED: &str = "You must select an image to upload.";

/// Uploader state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploaderState {
    Idle,
    Resolving,
    Uploading,
}

/// A downloaded avatar ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    /// Raw image bytes
    pub data: Vec<u8>,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub mime_type: String,
}

impl DisplayImage {
    fn from_stored(object: StoredObject, path: &AvatarPath) -> Self {
        let mime_type = object
            .content_type
            .unwrap_or_else(|| mime_type_for_path(path).to_string());

        Self {
            data: object.bytes,
            mime_type,
        }
    }

    /// Inline `data:` URL usable as an image source
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// What a renderer draws for the avatar widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarView {
    /// Image to draw, or `None` for the placeholder
    pub image: Option<DisplayImage>,
    /// Edge length in pixels
    pub size: u32,
    pub button_label: &'static str,
    pub upload_enabled: bool,
    pub toast: Option<ToastView>,
}

#[derive(Debug)]
struct UploaderInner {
    state: UploaderState,
    image: Option<DisplayImage>,
    // Reference the latest resolve was asked for; older downloads that
    // finish late are discarded.
    reference: Option<AvatarPath>,
}

/// Avatar widget state.
pub struct AvatarUploader {
    user_id: UserId,
    objects: Arc<dyn ObjectStore>,
    settings: UiSettings,
    inner: Mutex<UploaderInner>,
    toast: NotificationSlot,
}

/// Returns the uploader to `Idle` when an upload ends, including when the
/// upload future is dropped mid-flight.
struct UploadingGuard<'a> {
    inner: &'a Mutex<UploaderInner>,
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        let mut inner = lock(self.inner);
        if inner.state == UploaderState::Uploading {
            inner.state = UploaderState::Idle;
        }
    }
}

impl AvatarUploader {
    pub fn new(user_id: UserId, objects: Arc<dyn ObjectStore>, settings: UiSettings) -> Self {
        Self {
            user_id,
            objects,
            settings,
            inner: Mutex::new(UploaderInner {
                state: UploaderState::Idle,
                image: None,
                reference: None,
            }),
            toast: NotificationSlot::new(),
        }
    }

    pub fn state(&self) -> UploaderState {
        lock(&self.inner).state
    }

    /// The resolved image, if any.
    pub fn image(&self) -> Option<DisplayImage> {
        lock(&self.inner).image.clone()
    }

    /// The uploader's own notification slot.
    pub fn notifications(&self) -> &NotificationSlot {
        &self.toast
    }

    /// Resolve a stored avatar reference into a displayable image.
    ///
    /// Call on mount and whenever the reference changes. An absent or blank
    /// reference shows the placeholder without any network call. A failed
    /// download keeps the placeholder and is logged; it is only shown as a
    /// notification when `surface_download_errors` is set.
    pub async fn resolve(&self, reference: Option<&AvatarPath>) -> Result<Option<DisplayImage>> {
        let Some(path) = reference.filter(|p| !p.is_empty()) else {
            let mut inner = lock(&self.inner);
            inner.reference = None;
            inner.image = None;
            return Ok(None);
        };

        {
            let mut inner = lock(&self.inner);
            if inner.reference.as_ref() == Some(path) && inner.image.is_some() {
                return Ok(inner.image.clone());
            }
            inner.reference = Some(path.clone());
            if inner.state == UploaderState::Idle {
                inner.state = UploaderState::Resolving;
            }
        }

        debug!(user_id = %self.user_id, path = %path, "Resolving avatar");
        let result = self.objects.download(path).await;

        let mut inner = lock(&self.inner);
        if inner.state == UploaderState::Resolving {
            inner.state = UploaderState::Idle;
        }

        if inner.reference.as_ref() != Some(path) {
            debug!(path = %path, "Discarding stale avatar download");
            return Ok(inner.image.clone());
        }

        match result {
            Ok(object) => {
                let image = DisplayImage::from_stored(object, path);
                info!(path = %path, size = image.data.len(), "Avatar resolved");
                inner.image = Some(image.clone());
                Ok(Some(image))
            }
            Err(e) => {
                inner.image = None;
                drop(inner);

                warn!(path = %path, error = %e, "Error downloading image");
                if self.settings.surface_download_errors {
                    self.toast.show(
                        Notification::error(DOWNLOAD_FAILURE),
                        self.settings.upload_toast(),
                    );
                }
                Err(e)
            }
        }
    }

    /// Upload the first selected file as the new avatar.
    ///
    /// Returns the new avatar reference; the caller records it on the
    /// profile. The stored image shown by the widget is not changed here;
    /// resolve the new reference to display it.
    pub async fn upload(&self, files: &[SelectedFile]) -> Result<AvatarPath> {
        let _guard = {
            let mut inner = lock(&self.inner);
            if inner.state == UploaderState::Uploading {
                debug!(user_id = %self.user_id, "Upload already in progress, ignoring");
                return Err(ProfileError::Busy("Avatar upload"));
            }
            inner.state = UploaderState::Uploading;
            UploadingGuard { inner: &self.inner }
        };

        let Some(file) = files.first() else {
            warn!(user_id = %self.user_id, "Upload requested without a file");
            self.toast.show(
                Notification::error(NO_FILE_SELECTED),
                self.settings.upload_toast(),
            );
            return Err(ProfileError::validation(NO_FILE_SELECTED));
        };

        let path = generate_avatar_path(&self.user_id, file);
        debug!(user_id = %self.user_id, path = %path, size = file.len(), "Uploading avatar");

        match self.objects.upload(&path, file).await {
            Ok(()) => {
                info!(user_id = %self.user_id, path = %path, "Avatar uploaded");
                self.toast.show(
                    Notification::success(UPLOAD_SUCCESS),
                    self.settings.upload_toast(),
                );
                Ok(path)
            }
            Err(e) => {
                warn!(user_id = %self.user_id, path = %path, error = %e, "Avatar upload failed");
                self.toast.show(
                    Notification::error(UPLOAD_FAILURE),
                    self.settings.upload_toast(),
                );
                Err(e)
            }
        }
    }

    pub fn view(&self) -> AvatarView {
        let inner = lock(&self.inner);
        let uploading = inner.state == UploaderState::Uploading;

        AvatarView {
            image: inner.image.clone(),
            size: self.settings.avatar_size,
            button_label: if uploading { "Uploading ..." } else { "Upload" },
            upload_enabled: !uploading,
            toast: self.toast.view(),
        }
    }
}

/// Storage path for a new avatar: `{user_id}-{random fraction}.{extension}`.
///
/// The random suffix makes collisions between uploads vanishingly unlikely;
/// uniqueness is not otherwise enforced.
pub fn generate_avatar_path(user_id: &UserId, file: &SelectedFile) -> AvatarPath {
    format_avatar_path(user_id, rand::random::<f64>(), file.extension())
}

/// Deterministic part of `generate_avatar_path`.
pub fn format_avatar_path(user_id: &UserId, fraction: f64, extension: &str) -> AvatarPath {
    AvatarPath::new(format!("{}-{}.{}", user_id, fraction, extension))
}

fn mime_type_for_path(path: &AvatarPath) -> &'static str {
    match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
