//! Main backend client.

use crate::auth::AuthClient;
use crate::error::{BackendError, Result};
use crate::profiles::ProfilesClient;
use crate::storage::StorageClient;
use crate::types::{BackendConfig, TokenResponse, UserResponse};
use profile_core::UserId;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;
use url::Url;

/// Main client for the backend platform.
///
/// The client holds the project URL, the public API key and the current
/// session tokens, and hands out short-lived sub-clients for auth, profile
/// rows and avatar storage.
///
/// # Example
///
/// ```ignore
/// use profile_client::{BackendClient, BackendConfig};
///
/// let client = BackendClient::new(BackendConfig::new("https://abc.example.co", "anon-key"))?;
///
/// let token = client.sign_in("ada@example.com", "secret").await?;
/// let profile = client.profiles().await?.client().fetch(&user_id).await?;
/// ```
pub struct BackendClient {
    http: Client,
    config: Arc<RwLock<BackendConfig>>,
}

impl BackendClient {
    /// Create a new client with the given configuration.
    pub fn new(config: BackendConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(BackendError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim_end_matches('/').to_string();
        match Url::parse(&url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            _ => {
                return Err(BackendError::InvalidUrl(
                    "URL must start with http:// or https://".into(),
                ))
            }
        }

        if config.api_key.is_empty() {
            return Err(BackendError::InvalidConfig("API key cannot be empty".into()));
        }

        // Every service on the platform expects the project key
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| BackendError::InvalidConfig(format!("API key: {}", e)))?;
        headers.insert("apikey", api_key);

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .user_agent(format!("ProfileAccount/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BackendError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(BackendConfig { url, ..config })),
        })
    }

    /// Get the project URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.access_token.is_some()
    }

    /// Sign in with email and password.
    ///
    /// On success, the tokens are stored for subsequent requests.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let url = self.url().await;

        let auth_client = AuthClient::new(&self.http, &url);
        let response = auth_client.sign_in_with_password(email, password).await?;

        let mut config = self.config.write().await;
        config.access_token = Some(response.access_token.clone());
        config.refresh_token = response.refresh_token.clone();
        config.user_id = Some(UserId::new(response.user.id.as_str()));

        Ok(response)
    }

    /// Get the current tokens.
    pub async fn get_tokens(&self) -> (Option<String>, Option<String>) {
        let config = self.config.read().await;
        (config.access_token.clone(), config.refresh_token.clone())
    }

    /// The user the stored tokens were issued to, if signed in through this client.
    pub async fn signed_in_user(&self) -> Option<UserId> {
        self.config.read().await.user_id.clone()
    }

    /// Look up the user the stored access token belongs to.
    pub async fn current_user(&self) -> Result<UserResponse> {
        let (url, access_token) = self.authorized().await?;

        AuthClient::new(&self.http, &url)
            .get_user(&access_token)
            .await
    }

    /// Revoke the stored session and clear the tokens.
    ///
    /// Tokens are cleared even when the revoke request fails.
    pub async fn sign_out(&self) -> Result<()> {
        let (url, access_token) = self.authorized().await?;

        let result = AuthClient::new(&self.http, &url)
            .sign_out(&access_token)
            .await;

        self.clear_tokens().await;
        result
    }

    /// Revoke an arbitrary session's token.
    ///
    /// Stored tokens are cleared only if they belong to that session.
    pub(crate) async fn revoke(&self, access_token: &str) -> Result<()> {
        let url = self.url().await;
        let result = AuthClient::new(&self.http, &url)
            .sign_out(access_token)
            .await;

        let mut config = self.config.write().await;
        if config.access_token.as_deref() == Some(access_token) {
            config.access_token = None;
            config.refresh_token = None;
            config.user_id = None;
        }

        result
    }

    async fn clear_tokens(&self) {
        let mut config = self.config.write().await;
        config.access_token = None;
        config.refresh_token = None;
        config.user_id = None;
        info!("Cleared session tokens");
    }

    async fn authorized(&self) -> Result<(String, String)> {
        let config = self.config.read().await;
        let access_token = config
            .access_token
            .clone()
            .ok_or(BackendError::AuthRequired)?;
        Ok((config.url.clone(), access_token))
    }

    /// Get a client for profile row operations.
    ///
    /// Returns an error if not authenticated.
    pub async fn profiles(&self) -> Result<ProfilesClientHandle> {
        let config = self.config.read().await;
        let access_token = config
            .access_token
            .clone()
            .ok_or(BackendError::AuthRequired)?;

        Ok(ProfilesClientHandle {
            http: self.http.clone(),
            url: config.url.clone(),
            table: config.profiles_table.clone(),
            access_token,
        })
    }

    /// Get a client for avatar storage operations.
    ///
    /// Returns an error if not authenticated.
    pub async fn storage(&self) -> Result<StorageClientHandle> {
        let config = self.config.read().await;
        let access_token = config
            .access_token
            .clone()
            .ok_or(BackendError::AuthRequired)?;

        Ok(StorageClientHandle {
            http: self.http.clone(),
            url: config.url.clone(),
            bucket: config.avatar_bucket.clone(),
            access_token,
        })
    }
}

/// Handle for profile row operations.
///
/// Returned by `BackendClient::profiles()`; owns a snapshot of the URL and
/// token so the borrowed `ProfilesClient` can outlive the config lock.
pub struct ProfilesClientHandle {
    http: Client,
    url: String,
    table: String,
    access_token: String,
}

impl ProfilesClientHandle {
    /// Get the profiles client.
    pub fn client(&self) -> ProfilesClient<'_> {
        ProfilesClient::new(&self.http, &self.url, &self.table, &self.access_token)
    }
}

/// Handle for avatar storage operations.
pub struct StorageClientHandle {
    http: Client,
    url: String,
    bucket: String,
    access_token: String,
}

impl StorageClientHandle {
    /// Get the storage client.
    pub fn client(&self) -> StorageClient<'_> {
        StorageClient::new(&self.http, &self.url, &self.bucket, &self.access_token)
    }
}
