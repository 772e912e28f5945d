//! Admin account management.
//!
//! The console has no sign-up page; the first admin is created here. The
//! password is read from an environment variable so it never appears in
//! shell history or the process list.

use blush_core::config::{ConfigError, Env};
use blush_store::PgStore;
use blush_store::accounts::AccountService;

use super::{CliError, connect};

/// Create an account with the admin role.
///
/// # Errors
///
/// Fails when the password variable is unset, the email is invalid or
/// taken, or the password is too short.
pub async fn create_user(
    email: &str,
    name: Option<String>,
    password_env: &str,
) -> Result<(), CliError> {
    let env = Env::load();
    let password = env
        .optional(password_env)
        .ok_or_else(|| ConfigError::MissingEnvVar(password_env.to_owned()))?;

    let store = PgStore::new(connect(&env).await?);
    let user = AccountService::new(&store)
        .create_admin(email, &password, name)
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Admin user created");
    Ok(())
}
