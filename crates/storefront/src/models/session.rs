//! Session-stored identity.

use serde::{Deserialize, Serialize};

use blush_core::{Email, UserId, UserProfile, UserRole};

/// Minimal identity kept in the session cookie's server-side record.
///
/// The full profile is reloaded from the store on each request that needs
/// it, so renames and role changes show up without signing out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
}

impl From<&UserProfile> for CurrentUser {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            role: profile.role,
        }
    }
}

/// Session keys.
pub mod keys {
    /// The signed-in user.
    pub const CURRENT_USER: &str = "current_user";
}
