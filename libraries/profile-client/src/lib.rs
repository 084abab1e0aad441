//! Profile Account Backend Client
//!
//! HTTP client library for the managed backend platform behind Profile
//! Account.
//!
//! # Features
//!
//! - **Authentication**: Sign in with email/password, sign out
//! - **Profiles**: Read one profile row, upsert a profile row
//! - **Avatars**: Download and upload objects in the avatar bucket
//!
//! `BackendClient` also implements the `profile_core` collaborator traits, so
//! it can be handed straight to the UI components.
//!
//! # Example
//!
//! ```ignore
//! use profile_client::{BackendClient, BackendConfig};
//! use profile_core::ProfileStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BackendConfig::new("https://abc.example.co", "anon-key");
//!     let client = BackendClient::new(config)?;
//!
//!     let session = client.sign_in("ada@example.com", "secret").await?.into_session();
//!     let fields = client.fetch_profile(session.user_id()).await?;
//!     println!("{:?}", fields);
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod backend;
mod client;
mod error;
mod profiles;
mod storage;
mod types;

// Re-export main types
pub use client::{BackendClient, ProfilesClientHandle, StorageClientHandle};
pub use error::{BackendError, Result};
pub use types::{
    ApiError, BackendConfig, TokenResponse, UserResponse, DEFAULT_AVATAR_BUCKET,
    DEFAULT_PROFILES_TABLE,
};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use profiles::ProfilesClient;
pub use storage::StorageClient;
