//! Profile row operations against the REST row API.

use crate::error::{error_from_response, send_error, BackendError, Result};
use crate::types::PROFILE_COLUMNS;
use profile_core::{ProfileFields, ProfileRecord, UserId};
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

/// Media type asking the row API for exactly one object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Upsert preference: replace on primary-key conflict, no body in the reply.
const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=minimal";

/// Profile row client.
pub struct ProfilesClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    table: &'a str,
    access_token: &'a str,
}

impl<'a> ProfilesClient<'a> {
    pub(crate) fn new(
        http: &'a Client,
        base_url: &'a str,
        table: &'a str,
        access_token: &'a str,
    ) -> Self {
        Self {
            http,
            base_url,
            table,
            access_token,
        }
    }

    /// Fetch the editable fields of one profile.
    ///
    /// The single-object media type makes the row API answer 406 when no row
    /// matches; that is reported as `Ok(None)`.
    pub async fn fetch(&self, id: &UserId) -> Result<Option<ProfileFields>> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        debug!(url = %url, user_id = %id, "Fetching profile");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("select", PROFILE_COLUMNS.to_string()),
                ("id", format!("eq.{}", id)),
            ])
            .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .bearer_auth(self.access_token)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() {
            let fields: ProfileFields = response.json().await.map_err(|e| {
                BackendError::ParseError(format!("Failed to parse profile row: {}", e))
            })?;

            debug!(user_id = %id, "Fetched profile");
            Ok(Some(fields))
        } else if status == StatusCode::NOT_ACCEPTABLE {
            debug!(user_id = %id, "No profile row yet");
            Ok(None)
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Insert the record or replace the row with the same id.
    pub async fn upsert(&self, record: &ProfileRecord) -> Result<()> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        debug!(url = %url, user_id = %record.id, "Upserting profile");

        let response = self
            .http
            .post(&url)
            .header("Prefer", UPSERT_PREFERENCE)
            .bearer_auth(self.access_token)
            .json(record)
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            info!(user_id = %record.id, updated_at = %record.updated_at, "Profile upserted");
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}
