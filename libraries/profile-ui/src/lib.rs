//! Profile Account UI State
//!
//! Framework-agnostic components behind the account screens. Each component
//! owns its state, talks to the backend only through the `profile_core`
//! collaborator traits, and exposes a pure `view()` snapshot that a renderer
//! (terminal, web, desktop) can draw.
//!
//! Components are layered leaf-first:
//! - **Notification display**: `render()` plus the caller-side `NotificationSlot`
//! - **Avatar uploader**: resolves and uploads the avatar image
//! - **Profile form**: loads, edits and submits the profile row
//! - **Entry page**: email/password sign-in
//!
//! Every operation catches its own failure, turns it into a notification and
//! logs it; the `Result` it returns is for the caller's information only.

#![forbid(unsafe_code)]

pub mod account;
pub mod avatar;
pub mod entry;
pub mod notification;
mod settings;

pub use account::{ProfileForm, ProfileFormView};
pub use avatar::{
    format_avatar_path, generate_avatar_path, AvatarUploader, AvatarView, DisplayImage,
    UploaderState,
};
pub use entry::{SignInPage, SignInView};
pub use notification::{render, Notification, NotificationSlot, Severity, ToastView};
pub use settings::UiSettings;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock component state, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
