//! Account error types.

use thiserror::Error;

use blush_core::EmailError;

use crate::StoreError;

/// Errors from sign-up, sign-in and profile updates.
///
/// Most variants belong to one form field; [`AccountError::field`] names it
/// so the caller can show the message next to the right input.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Weak password")]
    WeakPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("New passwords don't match")]
    NewPasswordMismatch,

    #[error("User not found")]
    UserNotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    /// Signed in fine, but the console only admits admins.
    #[error("This account does not have admin access")]
    NotAdmin,

    #[error("password hashing error")]
    PasswordHash,

    #[error("database error: {0}")]
    Store(#[from] StoreError),
}

impl AccountError {
    /// Form field the message belongs to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidEmail(_) | Self::UserNotFound | Self::EmailInUse | Self::NotAdmin => {
                Some("email")
            }
            Self::PasswordTooShort { .. } | Self::WeakPassword | Self::WrongPassword => {
                Some("password")
            }
            Self::PasswordMismatch => Some("confirm_password"),
            Self::NewPasswordMismatch => Some("confirm_new_password"),
            Self::CurrentPasswordIncorrect => Some("current_password"),
            Self::PasswordHash | Self::Store(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_messages() {
        let cases = [
            (AccountError::UserNotFound, "email", "User not found"),
            (AccountError::WrongPassword, "password", "Wrong password"),
            (AccountError::EmailInUse, "email", "Email already in use"),
            (AccountError::WeakPassword, "password", "Weak password"),
            (
                AccountError::CurrentPasswordIncorrect,
                "current_password",
                "Current password is incorrect",
            ),
        ];
        for (err, field, message) in cases {
            assert_eq!(err.field(), Some(field));
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_backend_errors_have_no_field() {
        assert_eq!(AccountError::from(StoreError::NotFound).field(), None);
        assert_eq!(AccountError::PasswordHash.field(), None);
    }
}
