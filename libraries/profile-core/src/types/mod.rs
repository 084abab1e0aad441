//! Domain types for Profile Account

mod file;
mod ids;
mod profile;
mod session;

pub use file::{SelectedFile, StoredObject};
pub use ids::{AvatarPath, UserId};
pub use profile::{ProfileFields, ProfileRecord};
pub use session::{Session, SessionUser};
