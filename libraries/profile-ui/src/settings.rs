//! UI settings shared by the components

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Display sizes, notification delays and error-surfacing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Avatar edge length in pixels
    pub avatar_size: u32,

    /// How long a profile load failure stays on screen
    pub load_error_toast_ms: u64,

    /// How long a profile update result stays on screen
    pub update_toast_ms: u64,

    /// How long an avatar upload result stays on screen
    pub upload_toast_ms: u64,

    /// How long a sign-in or sign-out failure stays on screen
    pub auth_toast_ms: u64,

    /// Show a notification when the stored avatar cannot be downloaded.
    /// Off by default: the failure is only logged and the placeholder stays.
    pub surface_download_errors: bool,
}

impl UiSettings {
    /// Delay for the load failure notification
    pub fn load_error_toast(&self) -> Duration {
        Duration::from_millis(self.load_error_toast_ms)
    }

    /// Delay for update notifications
    pub fn update_toast(&self) -> Duration {
        Duration::from_millis(self.update_toast_ms)
    }

    /// Delay for upload notifications
    pub fn upload_toast(&self) -> Duration {
        Duration::from_millis(self.upload_toast_ms)
    }

    /// Delay for authentication notifications
    pub fn auth_toast(&self) -> Duration {
        Duration::from_millis(self.auth_toast_ms)
    }

    /// Names of delay settings that are zero.
    pub fn zero_delays(&self) -> Vec<&'static str> {
        [
            ("load_error_toast_ms", self.load_error_toast_ms),
            ("update_toast_ms", self.update_toast_ms),
            ("upload_toast_ms", self.upload_toast_ms),
            ("auth_toast_ms", self.auth_toast_ms),
        ]
        .into_iter()
        .filter(|(_, ms)| *ms == 0)
        .map(|(name, _)| name)
        .collect()
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            avatar_size: 150,
            load_error_toast_ms: 3000,
            update_toast_ms: 4000,
            upload_toast_ms: 2000,
            auth_toast_ms: 3000,
            surface_download_errors: false,
        }
    }
}
