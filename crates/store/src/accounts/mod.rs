//! Email and password accounts.
//!
//! Shared by the storefront (customers), the admin console (admins only) and
//! the CLI (bootstrapping the first admin).

mod error;

pub use error::AccountError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use serde::Deserialize;

use blush_core::{Email, UserId, UserProfile, UserRole};

use crate::{NewUser, ProfileChanges, StoreError, UserStore};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Sign-up form fields.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub display_name: Option<String>,
}

/// Profile edit form. Blank password fields mean "keep the password".
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

impl std::fmt::Debug for SignUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUp")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .field("display_name", &self.display_name)
            .finish()
    }
}

impl std::fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |p: &Option<String>| p.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ProfileUpdate")
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("current_password", &redact(&self.current_password))
            .field("new_password", &redact(&self.new_password))
            .field("confirm_new_password", &redact(&self.confirm_new_password))
            .finish()
    }
}

/// Account operations over any [`UserStore`].
pub struct AccountService<'a, S: UserStore + ?Sized> {
    users: &'a S,
}

impl<'a, S: UserStore + ?Sized> AccountService<'a, S> {
    #[must_use]
    pub const fn new(users: &'a S) -> Self {
        Self { users }
    }

    /// Register a customer.
    ///
    /// # Errors
    ///
    /// Field errors for a bad email, short or blank password, mismatched
    /// confirmation, or an email that is already registered.
    pub async fn sign_up(&self, form: SignUp) -> Result<UserProfile, AccountError> {
        let email = Email::parse(&form.email)?;
        validate_password(&form.password)?;
        if form.password != form.confirm_password {
            return Err(AccountError::PasswordMismatch);
        }

        let user = self
            .create(email, &form.password, UserRole::Customer, form.display_name)
            .await?;
        tracing::info!(user_id = %user.id, "Customer signed up");
        Ok(user)
    }

    /// Create an account with the admin role.
    ///
    /// # Errors
    ///
    /// Same as [`AccountService::sign_up`], minus the confirmation check.
    pub async fn create_admin(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<UserProfile, AccountError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        self.create(email, password, UserRole::Admin, display_name)
            .await
    }

    async fn create(
        &self,
        email: Email,
        password: &str,
        role: UserRole,
        display_name: Option<String>,
    ) -> Result<UserProfile, AccountError> {
        let password_hash = hash_password(password)?;
        self.users
            .create_user(NewUser {
                email,
                display_name: display_name
                    .map(|n| n.trim().to_owned())
                    .filter(|n| !n.is_empty()),
                role,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AccountError::EmailInUse,
                other => AccountError::Store(other),
            })
    }

    /// Check an email and password.
    ///
    /// # Errors
    ///
    /// [`AccountError::UserNotFound`] for an unknown email and
    /// [`AccountError::WrongPassword`] for a bad password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AccountError> {
        let email = Email::parse(email)?;
        let (user, password_hash) = self
            .users
            .find_credentials(&email)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        verify_password(password, &password_hash)?;
        Ok(user)
    }

    /// [`AccountService::sign_in`] restricted to the admin role.
    ///
    /// # Errors
    ///
    /// As `sign_in`, plus [`AccountError::NotAdmin`] for customer accounts.
    pub async fn sign_in_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AccountError> {
        let user = self.sign_in(email, password).await?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "Non-admin tried to sign in to the console");
            return Err(AccountError::NotAdmin);
        }
        Ok(user)
    }

    /// Profile for a signed-in user id, if the account still exists.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Store`] if the lookup fails.
    pub async fn current_user(&self, id: UserId) -> Result<Option<UserProfile>, AccountError> {
        Ok(self.users.get_user(id).await?)
    }

    /// Change display name, email and password in one write.
    ///
    /// Every field is validated before anything is written. A password
    /// change needs the current password.
    ///
    /// # Errors
    ///
    /// Field errors for each failed check; [`AccountError::EmailInUse`] when
    /// the new email belongs to someone else.
    pub async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AccountError> {
        let current = self
            .users
            .get_user(id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let mut changes = ProfileChanges::default();

        if let Some(name) = update.display_name {
            let name = Some(name.trim().to_owned()).filter(|n| !n.is_empty());
            if name != current.display_name {
                changes.display_name = Some(name);
            }
        }

        if let Some(email) = update.email.filter(|e| !e.trim().is_empty()) {
            let email = Email::parse(&email)?;
            if email != current.email {
                changes.email = Some(email);
            }
        }

        if let Some(new_password) = update.new_password.filter(|p| !p.is_empty()) {
            if update.confirm_new_password.as_deref() != Some(new_password.as_str()) {
                return Err(AccountError::NewPasswordMismatch);
            }
            validate_password(&new_password)?;

            let stored = self
                .users
                .password_hash(id)
                .await?
                .ok_or(AccountError::UserNotFound)?;
            let given = update.current_password.unwrap_or_default();
            verify_password(&given, &stored).map_err(|e| match e {
                AccountError::WrongPassword => AccountError::CurrentPasswordIncorrect,
                other => other,
            })?;

            changes.password_hash = Some(hash_password(&new_password)?);
        }

        if changes.is_empty() {
            return Ok(current);
        }

        let updated = self
            .users
            .update_profile(id, changes)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AccountError::EmailInUse,
                StoreError::NotFound => AccountError::UserNotFound,
                other => AccountError::Store(other),
            })?;
        tracing::info!(user_id = %id, "Profile updated");
        Ok(updated)
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if password.trim().is_empty() {
        return Err(AccountError::WeakPassword);
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AccountError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AccountError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::WrongPassword)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn sign_up_form(email: &str, password: &str, confirm: &str) -> SignUp {
        SignUp {
            email: email.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm.to_owned(),
            display_name: None,
        }
    }

    #[test]
    fn test_password_rules() {
        assert!(matches!(
            validate_password("abc12"),
            Err(AccountError::PasswordTooShort { min: 6 })
        ));
        assert!(matches!(
            validate_password("      "),
            Err(AccountError::WeakPassword)
        ));
        assert!(validate_password("secret").is_ok());
    }

    #[test]
    fn test_hash_roundtrip() {
        let hash = hash_password("lipgloss").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("lipgloss", &hash).is_ok());
        assert!(matches!(
            verify_password("mascara", &hash),
            Err(AccountError::WrongPassword)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let store = MemoryStore::new();
        let accounts = AccountService::new(&store);

        let user = accounts
            .sign_up(sign_up_form("mia@example.com", "secret1", "secret1"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Customer);

        let signed_in = accounts.sign_in("mia@EXAMPLE.com", "secret1").await.unwrap();
        assert_eq!(signed_in.id, user.id);
    }

    #[tokio::test]
    async fn test_email_case_does_not_split_accounts() {
        let store = MemoryStore::new();
        let accounts = AccountService::new(&store);

        let user = accounts
            .sign_up(sign_up_form("Ada@Example.com", "secret1", "secret1"))
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "ada@example.com");

        let signed_in = accounts.sign_in("ada@example.com", "secret1").await.unwrap();
        assert_eq!(signed_in.id, user.id);

        let second = accounts
            .sign_up(sign_up_form("ADA@example.com", "secret1", "secret1"))
            .await;
        assert!(matches!(second, Err(AccountError::EmailInUse)));
    }

    #[tokio::test]
    async fn test_sign_up_errors() {
        let store = MemoryStore::new();
        let accounts = AccountService::new(&store);

        let mismatch = accounts
            .sign_up(sign_up_form("a@example.com", "secret1", "secret2"))
            .await;
        assert!(matches!(mismatch, Err(AccountError::PasswordMismatch)));

        accounts
            .sign_up(sign_up_form("a@example.com", "secret1", "secret1"))
            .await
            .unwrap();
        let taken = accounts
            .sign_up(sign_up_form("a@example.com", "secret1", "secret1"))
            .await;
        assert!(matches!(taken, Err(AccountError::EmailInUse)));
    }

    #[tokio::test]
    async fn test_sign_in_errors() {
        let store = MemoryStore::new();
        let accounts = AccountService::new(&store);
        accounts
            .sign_up(sign_up_form("b@example.com", "secret1", "secret1"))
            .await
            .unwrap();

        let unknown = accounts.sign_in("nobody@example.com", "secret1").await;
        assert!(matches!(unknown, Err(AccountError::UserNotFound)));

        let wrong = accounts.sign_in("b@example.com", "nope-nope").await;
        assert!(matches!(wrong, Err(AccountError::WrongPassword)));
    }

    #[tokio::test]
    async fn test_admin_sign_in_requires_admin_role() {
        let store = MemoryStore::new();
        let accounts = AccountService::new(&store);
        accounts
            .sign_up(sign_up_form("c@example.com", "secret1", "secret1"))
            .await
            .unwrap();
        accounts
            .create_admin("boss@example.com", "secret1", None)
            .await
            .unwrap();

        let customer = accounts.sign_in_admin("c@example.com", "secret1").await;
        assert!(matches!(customer, Err(AccountError::NotAdmin)));

        let admin = accounts
            .sign_in_admin("boss@example.com", "secret1")
            .await
            .unwrap();
        assert!(!admin.shows_public_chrome());
    }

    #[tokio::test]
    async fn test_update_profile_password_change() {
        let store = MemoryStore::new();
        let accounts = AccountService::new(&store);
        let user = accounts
            .sign_up(sign_up_form("d@example.com", "secret1", "secret1"))
            .await
            .unwrap();

        let wrong_current = accounts
            .update_profile(
                user.id,
                ProfileUpdate {
                    current_password: Some("guess".to_owned()),
                    new_password: Some("secret2".to_owned()),
                    confirm_new_password: Some("secret2".to_owned()),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(matches!(
            wrong_current,
            Err(AccountError::CurrentPasswordIncorrect)
        ));

        let mismatch = accounts
            .update_profile(
                user.id,
                ProfileUpdate {
                    current_password: Some("secret1".to_owned()),
                    new_password: Some("secret2".to_owned()),
                    confirm_new_password: Some("secret3".to_owned()),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(matches!(mismatch, Err(AccountError::NewPasswordMismatch)));

        accounts
            .update_profile(
                user.id,
                ProfileUpdate {
                    display_name: Some("Dee".to_owned()),
                    current_password: Some("secret1".to_owned()),
                    new_password: Some("secret2".to_owned()),
                    confirm_new_password: Some("secret2".to_owned()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();

        assert!(accounts.sign_in("d@example.com", "secret2").await.is_ok());
        let profile = accounts.current_user(user.id).await.unwrap().unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Dee"));
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict() {
        let store = MemoryStore::new();
        let accounts = AccountService::new(&store);
        let first = accounts
            .sign_up(sign_up_form("e@example.com", "secret1", "secret1"))
            .await
            .unwrap();
        accounts
            .sign_up(sign_up_form("f@example.com", "secret1", "secret1"))
            .await
            .unwrap();

        let result = accounts
            .update_profile(
                first.id,
                ProfileUpdate {
                    email: Some("f@example.com".to_owned()),
                    ..ProfileUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AccountError::EmailInUse)));
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let form = sign_up_form("jo@example.com", "hunter22", "hunter22");
        let out = format!("{form:?}");
        assert!(out.contains("jo@example.com"));
        assert!(!out.contains("hunter22"));

        let update = ProfileUpdate {
            new_password: Some("hunter22".to_owned()),
            ..ProfileUpdate::default()
        };
        assert!(!format!("{update:?}").contains("hunter22"));
    }
}
