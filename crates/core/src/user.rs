//! User profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId, UserRole};

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether the storefront navigation and footer are shown.
    ///
    /// Admins work from the console and get a bare layout.
    #[must_use]
    pub fn shows_public_chrome(&self) -> bool {
        !self.is_admin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            email: Email::parse("kim@example.com").unwrap(),
            display_name: None,
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admins_hide_public_chrome() {
        assert!(profile(UserRole::Customer).shows_public_chrome());
        assert!(!profile(UserRole::Admin).shows_public_chrome());
    }

    #[test]
    fn test_serialized_profile_has_no_secrets() {
        let json = serde_json::to_value(profile(UserRole::Admin)).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("password_hash").is_none());
    }
}
