//! Object storage operations for avatar images.

use crate::error::{error_from_response, send_error, BackendError, Result};
use crate::types::ApiError;
use profile_core::{AvatarPath, SelectedFile, StoredObject};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

/// Storage client bound to one bucket.
pub struct StorageClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    bucket: &'a str,
    access_token: &'a str,
}

impl<'a> StorageClient<'a> {
    pub(crate) fn new(
        http: &'a Client,
        base_url: &'a str,
        bucket: &'a str,
        access_token: &'a str,
    ) -> Self {
        Self {
            http,
            base_url,
            bucket,
            access_token,
        }
    }

    fn object_url(&self, path: &AvatarPath) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            path.as_str()
        )
    }

    /// Download the object at `path`.
    pub async fn download(&self, path: &AvatarPath) -> Result<StoredObject> {
        let url = self.object_url(path);
        debug!(url = %url, path = %path, "Downloading object");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
                // The storage service reports a missing object as 400 or 404
                // depending on version.
                return Err(BackendError::ServerError {
                    status: status.as_u16(),
                    message: format!("Object not found: {}", path),
                });
            }
            return Err(error_from_response(response).await);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await?.to_vec();

        info!(path = %path, size = bytes.len(), "Object downloaded");

        Ok(StoredObject {
            bytes,
            content_type,
        })
    }

    /// Upload `file` to `path`.
    ///
    /// Never overwrites: an existing object at `path` is `ObjectExists`.
    pub async fn upload(&self, path: &AvatarPath, file: &SelectedFile) -> Result<()> {
        let url = self.object_url(path);
        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or_else(|| mime_type_for_extension(file.extension()));

        debug!(url = %url, path = %path, size = file.len(), content_type = %content_type, "Uploading object");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token)
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() {
            info!(path = %path, size = file.len(), "Object uploaded");
            Ok(())
        } else if status == StatusCode::CONFLICT {
            Err(BackendError::ObjectExists(path.to_string()))
        } else if status == StatusCode::BAD_REQUEST {
            // Older storage versions report a duplicate as 400 with a body
            // naming the conflict.
            let error_text = response.text().await.unwrap_or_default();
            if error_text.contains("Duplicate") || error_text.contains("already exists") {
                Err(BackendError::ObjectExists(path.to_string()))
            } else {
                Err(BackendError::ServerError {
                    status: 400,
                    message: ApiError::message_from_body(&error_text),
                })
            }
        } else {
            Err(error_from_response(response).await)
        }
    }
}

/// Get the MIME type for an image file extension.
pub(crate) fn mime_type_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
