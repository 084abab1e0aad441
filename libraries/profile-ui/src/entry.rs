//! Entry page
//!
//! Email and password sign-in. The session it returns is what the profile
//! form is built from.

use crate::lock;
use crate::notification::{Notification, NotificationSlot, ToastView};
use crate::settings::UiSettings;
use profile_core::{Authenticator, ProfileError, Result, Session};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const MISSING_CREDENTIALS: &str = "Email and password are required.";

/// What a renderer draws for the sign-in page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInView {
    pub heading: &'static str,
    pub email: String,
    /// Whether a password has been entered; the password itself is never
    /// part of a view.
    pub has_password: bool,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub toast: Option<ToastView>,
}

#[derive(Default)]
struct EntryInner {
    email: String,
    password: String,
    pending: bool,
}

struct PendingGuard<'a> {
    inner: &'a Mutex<EntryInner>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.inner).pending = false;
    }
}

/// Sign-in form state.
pub struct SignInPage {
    auth: Arc<dyn Authenticator>,
    settings: UiSettings,
    inner: Mutex<EntryInner>,
    toast: NotificationSlot,
}

impl SignInPage {
    pub fn new(auth: Arc<dyn Authenticator>, settings: UiSettings) -> Self {
        Self {
            auth,
            settings,
            inner: Mutex::new(EntryInner::default()),
            toast: NotificationSlot::new(),
        }
    }

    pub fn set_email(&self, email: impl Into<String>) {
        lock(&self.inner).email = email.into();
    }

    pub fn set_password(&self, password: impl Into<String>) {
        lock(&self.inner).password = password.into();
    }

    pub fn notifications(&self) -> &NotificationSlot {
        &self.toast
    }

    /// Exchange the entered credentials for a session.
    ///
    /// Empty fields fail validation without contacting the auth service.
    /// A rejected sign-in shows the service's message.
    pub async fn sign_in(&self) -> Result<Session> {
        let (email, password, _guard) = {
            let mut inner = lock(&self.inner);
            if inner.pending {
                debug!("Sign-in already pending, ignoring");
                return Err(ProfileError::Busy("Sign-in"));
            }

            let email = inner.email.trim().to_string();
            if email.is_empty() || inner.password.is_empty() {
                drop(inner);
                self.toast.show(
                    Notification::error(MISSING_CREDENTIALS),
                    self.settings.auth_toast(),
                );
                return Err(ProfileError::validation(MISSING_CREDENTIALS));
            }

            inner.pending = true;
            (
                email,
                inner.password.clone(),
                PendingGuard { inner: &self.inner },
            )
        };

        debug!(email = %email, "Signing in");
        match self.auth.sign_in(&email, &password).await {
            Ok(session) => {
                info!(user_id = %session.user_id(), "Signed in");
                lock(&self.inner).password.clear();
                self.toast.clear();
                Ok(session)
            }
            Err(e) => {
                warn!(email = %email, error = %e, "Sign-in failed");
                let message = match &e {
                    ProfileError::Auth(message) => message.clone(),
                    other => other.to_string(),
                };
                self.toast
                    .show(Notification::error(message), self.settings.auth_toast());
                Err(e)
            }
        }
    }

    pub fn view(&self) -> SignInView {
        let inner = lock(&self.inner);

        SignInView {
            heading: "Login",
            email: inner.email.clone(),
            has_password: !inner.password.is_empty(),
            submit_label: if inner.pending { "Loading ..." } else { "Login" },
            submit_enabled: !inner.pending,
            toast: self.toast.view(),
        }
    }
}
