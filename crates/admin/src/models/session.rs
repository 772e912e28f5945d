//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use blush_core::{Email, UserId, UserProfile};

/// Session-stored admin identity.
///
/// Only the id is trusted on later requests; [`crate::middleware::RequireAdmin`]
/// reloads the profile so a demoted account loses access at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
}

impl From<&UserProfile> for CurrentAdmin {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            display_name: profile.display_name.clone(),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
