//! Authentication methods for the backend auth service.

use crate::error::{error_from_response, send_error, BackendError, Result};
use crate::types::{ApiError, PasswordGrantRequest, TokenResponse, UserResponse};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

/// Authentication client for the backend auth service.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Sign in with email and password.
    ///
    /// Returns tokens and the signed-in user on success.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let url = format!("{}/auth/v1/token", self.base_url);
        debug!(url = %url, email = %email, "Attempting sign-in");

        let request = PasswordGrantRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .query(&[("grant_type", "password")])
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() {
            let token: TokenResponse = response.json().await.map_err(|e| {
                BackendError::ParseError(format!("Failed to parse sign-in response: {}", e))
            })?;

            info!(user_id = %token.user.id, "Sign-in successful");

            Ok(token)
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            let message = ApiError::message_from_body(&error_text);
            warn!(status = %status, error = %message, "Sign-in rejected");
            Err(BackendError::AuthFailed(message))
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Get the user an access token belongs to.
    pub async fn get_user(&self, access_token: &str) -> Result<UserResponse> {
        let url = format!("{}/auth/v1/user", self.base_url);
        debug!(url = %url, "Getting current user");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            response.json().await.map_err(|e| {
                BackendError::ParseError(format!("Failed to parse user response: {}", e))
            })
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Revoke the session an access token belongs to.
    ///
    /// An already expired token counts as signed out.
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        debug!(url = %url, "Signing out");

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            info!("Signed out");
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}
