//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; not needed with `STOREFRONT_STORE=memory`)
//!
//! ## Optional
//! - `STOREFRONT_STORE` - `postgres` (default) or `memory`
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_FEATURED_LIMIT` - Products on the featured shelf (default: 3)
//! - `STOREFRONT_RATE_LIMIT` - Throttle auth endpoints per client IP (default: true)
//! - `DELIVERY_FEE` - Flat fee added to every order total (default: 0)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::net::{IpAddr, SocketAddr};

use rust_decimal::Decimal;
use secrecy::SecretString;
use url::Url;

use blush_core::Price;
use blush_core::config::{ConfigError, Env, SentryConfig, StoreBackend};

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub backend: StoreBackend,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Flat delivery fee added to each order
    pub delivery_fee: Price,
    /// How many featured products the home shelf shows
    pub featured_limit: usize,
    /// Apply per-IP rate limits to sign-in and sign-up
    pub rate_limit: bool,
    pub sentry: SentryConfig,
}

impl StorefrontConfig {
    /// Load configuration from the process environment (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&Env::load())
    }

    /// Load configuration from an explicit environment snapshot.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_vars(env: &Env) -> Result<Self, ConfigError> {
        let backend = StoreBackend::from_env(env, "STOREFRONT_DATABASE_URL", "STOREFRONT_STORE")?;
        let host = env.parse_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parse_or("STOREFRONT_PORT", 3000_u16)?;
        let base_url = env.required("STOREFRONT_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_owned(), e.to_string())
        })?;
        let session_secret = env.session_secret("STOREFRONT_SESSION_SECRET")?;
        let delivery_fee = delivery_fee(env)?;
        let featured_limit = env.parse_or("STOREFRONT_FEATURED_LIMIT", 3_usize)?;
        let rate_limit = env.flag("STOREFRONT_RATE_LIMIT", true)?;

        Ok(Self {
            backend,
            host,
            port,
            base_url,
            session_secret,
            delivery_fee,
            featured_limit,
            rate_limit,
            sentry: SentryConfig::from_env(env),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

/// `DELIVERY_FEE`, a non-negative decimal; unset means free delivery.
fn delivery_fee(env: &Env) -> Result<Price, ConfigError> {
    let amount = env.parse_or("DELIVERY_FEE", Decimal::ZERO)?;
    Price::new(amount).map_err(|e| ConfigError::InvalidEnvVar("DELIVERY_FEE".to_owned(), e.to_string()))
}
