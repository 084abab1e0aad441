/// Profile domain types
use crate::types::{AvatarPath, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The editable columns of a profile row.
///
/// This is also the shape returned by a single-row read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    /// Display name
    #[serde(default)]
    pub full_name: Option<String>,

    /// Public handle
    #[serde(default)]
    pub username: Option<String>,

    /// Personal website (free text, usually a URL)
    #[serde(default)]
    pub website: Option<String>,

    /// Reference to the stored avatar image
    #[serde(default)]
    pub avatar_url: Option<AvatarPath>,
}

impl ProfileFields {
    /// True when every field is unset
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.username.is_none()
            && self.website.is_none()
            && self.avatar_url.is_none()
    }
}

/// A complete profile row as written by an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Owner; always the authenticated user
    pub id: UserId,

    /// Display name
    pub full_name: Option<String>,

    /// Public handle
    pub username: Option<String>,

    /// Personal website
    pub website: Option<String>,

    /// Reference to the stored avatar image
    pub avatar_url: Option<AvatarPath>,

    /// Time of this write
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Build the row for `id` from locally edited fields.
    pub fn new(id: &UserId, fields: &ProfileFields, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: id.clone(),
            full_name: fields.full_name.clone(),
            username: fields.username.clone(),
            website: fields.website.clone(),
            avatar_url: fields.avatar_url.clone(),
            updated_at,
        }
    }

    /// The editable part of the record
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            full_name: self.full_name.clone(),
            username: self.username.clone(),
            website: self.website.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}
