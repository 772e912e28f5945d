//! Environment configuration shared by the storefront, admin and CLI binaries.
//!
//! [`Env`] is a snapshot of the variables a binary reads, so loaders can be
//! exercised in tests without touching the process environment.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Fallback database variable set by `fly postgres attach`.
const SHARED_DATABASE_URL: &str = "DATABASE_URL";

/// Lowercase substrings that mark a copied-in example value.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// A snapshot of environment variables.
///
/// Empty values count as unset.
#[derive(Clone, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Env").field("keys", &keys).finish()
    }
}

impl Env {
    /// Load `.env` if present, then snapshot the process environment.
    #[must_use]
    pub fn load() -> Self {
        // A missing .env file is the normal case in production.
        let _ = dotenvy::dotenv();
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build an environment from explicit pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get an optional variable.
    #[must_use]
    pub fn optional(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    }

    /// Get a required variable.
    ///
    /// # Errors
    ///
    /// Returns `MissingEnvVar` when the variable is unset or empty.
    pub fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
    }

    /// Get a variable, falling back to `default`.
    #[must_use]
    pub fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_owned())
    }

    /// Parse a variable, falling back to `default` when unset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEnvVar` when the variable is set but does not parse.
    pub fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
        })
    }

    /// Parse a boolean switch (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidEnvVar` for any other value.
    pub fn flag(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidEnvVar(
                key.to_owned(),
                format!("expected a boolean, got {raw:?}"),
            )),
        }
    }

    /// Database URL from `primary_key`, else the shared `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `MissingEnvVar` naming `primary_key` when neither is set.
    pub fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional(SHARED_DATABASE_URL))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_owned()))
    }

    /// Load a secret that must look randomly generated.
    ///
    /// # Errors
    ///
    /// Returns `MissingEnvVar` when unset, `InsecureSecret` when the value
    /// looks like a placeholder or has low entropy.
    pub fn secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }

    /// Load a session secret: a strong secret of at least 32 characters.
    ///
    /// # Errors
    ///
    /// See [`Env::secret`]; also `InsecureSecret` when too short.
    pub fn session_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let secret = self.secret(key)?;
        validate_session_secret(&secret, key)?;
        Ok(secret)
    }
}

/// Where the collections live.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres { database_url: SecretString },
    /// Process-local collections; everything is lost on restart.
    Memory,
}

impl StoreBackend {
    /// Read `backend_key` (`postgres` by default, or `memory`) and, for
    /// `PostgreSQL`, the database URL from `url_key`.
    ///
    /// # Errors
    ///
    /// `InvalidEnvVar` for an unknown backend, `MissingEnvVar` when the
    /// database URL is needed but unset.
    pub fn from_env(env: &Env, url_key: &str, backend_key: &str) -> Result<Self, ConfigError> {
        match env.or_default(backend_key, "postgres").as_str() {
            "postgres" => Ok(Self::Postgres {
                database_url: env.database_url(url_key)?,
            }),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidEnvVar(
                backend_key.to_owned(),
                format!("expected postgres or memory, got {other:?}"),
            )),
        }
    }
}

/// Sentry settings common to every binary.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl SentryConfig {
    /// Read `SENTRY_DSN`, `SENTRY_ENVIRONMENT` and the two sample rates.
    ///
    /// Unparseable rates fall back to 1.0.
    #[must_use]
    pub fn from_env(env: &Env) -> Self {
        let rate = |key: &str| -> f32 {
            env.optional(key)
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0)
        };
        Self {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate: rate("SENTRY_SAMPLE_RATE"),
            traces_sample_rate: rate("SENTRY_TRACES_SAMPLE_RATE"),
        }
    }
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 1.0,
        }
    }
}

/// Reject secrets shorter than the session minimum.
///
/// # Errors
///
/// Returns `InsecureSecret` when the secret is too short.
pub fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let len = secret.expose_secret().chars().count();
    if len < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters (got {len})"),
        ));
    }
    Ok(())
}

/// Shannon entropy in bits per character.
#[must_use]
pub fn shannon_entropy(s: &str) -> f64 {
    let mut freq: HashMap<char, usize> = HashMap::new();
    let mut total = 0_usize;
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)] // secret lengths are tiny
    let len = total as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject placeholder-looking or low-entropy secrets.
///
/// # Errors
///
/// Returns `InsecureSecret` describing the first failed check.
pub fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
