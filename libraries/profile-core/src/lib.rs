//! Profile Account Core
//!
//! Platform-agnostic domain types, traits, and error handling shared by the
//! backend client and the UI components.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `ProfileFields`, `ProfileRecord`, `Session`, `AvatarPath`, etc.
//! - **Collaborator Traits**: `ProfileStore`, `ObjectStore`, `Authenticator`
//! - **Error Handling**: Unified `ProfileError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use profile_core::{ProfileFields, ProfileRecord, UserId};
//!
//! let user = UserId::new("u1");
//! let fields = ProfileFields {
//!     full_name: Some("Ada Lovelace".into()),
//!     ..ProfileFields::default()
//! };
//!
//! let record = ProfileRecord::new(&user, &fields, Utc::now());
//! assert_eq!(record.id, user);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ProfileError, Result};
pub use traits::{Authenticator, ObjectStore, ProfileStore};

pub use types::{
    AvatarPath, ProfileFields, ProfileRecord, SelectedFile, Session, SessionUser, StoredObject,
    UserId,
};
