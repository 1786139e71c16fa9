//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `WEBHOOK_URL` - Order webhook endpoint (when `ORDER_BACKEND=webhook`)
//! - `DOCSTORE_BASE_URL` - Document store base URL (when `ORDER_BACKEND=docstore`)
//! - `DOCSTORE_API_KEY` - Document store API key (when `ORDER_BACKEND=docstore`)
//! - `IDENTITY_BASE_URL` - Identity provider base URL (when `ORDER_BACKEND=docstore`)
//! - `IDENTITY_API_KEY` - Identity provider API key (when `ORDER_BACKEND=docstore`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - Postgres for the session
//!   store; without it sessions live in process memory (dev only)
//! - `ORDER_BACKEND` - `webhook` | `docstore` | `memory` (default: webhook)
//! - `DOCSTORE_COLLECTION` - Order collection name (default: orders)
//! - `CATALOG_URL` - Static catalog document; absent means this environment
//!   cannot fetch the catalog at all
//! - `ADMIN_PASSPHRASE` - Shared admin gate passphrase (default: scoopadmin123)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Default admin gate passphrase. A UX gate only, compared server-side; this
/// is explicitly not an authentication boundary.
const DEFAULT_ADMIN_PASSPHRASE: &str = "scoopadmin123";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which order backend to persist through.
///
/// The two real backends are interchangeable behind [`crate::store::OrderStore`];
/// `memory` exists for tests and offline development.
#[derive(Debug, Clone)]
pub enum OrderBackendConfig {
    /// Backend A: a single POST endpoint in front of a spreadsheet.
    Webhook { url: String },
    /// Backend B: a hosted document database with built-in authentication.
    /// Selecting it turns on the order-submission sign-in gate.
    DocStore {
        base_url: String,
        api_key: SecretString,
        collection: String,
    },
    /// In-process store for tests and local development.
    Memory,
}

/// Identity provider connection details (docstore variant only).
#[derive(Clone)]
pub struct IdentityConfig {
    pub base_url: String,
    pub api_key: SecretString,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Postgres connection URL for the session store, when configured
    pub database_url: Option<SecretString>,
    /// Static catalog document URL; `None` means the environment cannot
    /// fetch the catalog, which the UI reports distinctly from a failed fetch
    pub catalog_url: Option<String>,
    /// Selected order backend
    pub order_backend: OrderBackendConfig,
    /// Identity provider (present iff the backend is `DocStore`)
    pub identity: Option<IdentityConfig>,
    /// Shared admin gate passphrase
    pub admin_passphrase: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let database_url = get_database_url();
        let catalog_url = get_optional_env("CATALOG_URL");
        let order_backend = order_backend_from_env()?;
        let identity = match &order_backend {
            OrderBackendConfig::DocStore { .. } => Some(IdentityConfig {
                base_url: get_required_env("IDENTITY_BASE_URL")?,
                api_key: SecretString::from(get_required_env("IDENTITY_API_KEY")?),
            }),
            _ => None,
        };
        let admin_passphrase = get_env_or_default("ADMIN_PASSPHRASE", DEFAULT_ADMIN_PASSPHRASE);
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            database_url,
            catalog_url,
            order_backend,
            identity,
            admin_passphrase,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether order submission requires a signed-in user.
    ///
    /// Only the document-store variant gates submission; the webhook variant
    /// accepts anonymous orders.
    #[must_use]
    pub const fn requires_sign_in(&self) -> bool {
        matches!(self.order_backend, OrderBackendConfig::DocStore { .. })
    }
}

/// Parse the `ORDER_BACKEND` selection and its backend-specific variables.
fn order_backend_from_env() -> Result<OrderBackendConfig, ConfigError> {
    match get_env_or_default("ORDER_BACKEND", "webhook").as_str() {
        "webhook" => Ok(OrderBackendConfig::Webhook {
            url: get_required_env("WEBHOOK_URL")?,
        }),
        "docstore" => Ok(OrderBackendConfig::DocStore {
            base_url: get_required_env("DOCSTORE_BASE_URL")?,
            api_key: SecretString::from(get_required_env("DOCSTORE_API_KEY")?),
            collection: get_env_or_default("DOCSTORE_COLLECTION", "orders"),
        }),
        "memory" => Ok(OrderBackendConfig::Memory),
        other => Err(ConfigError::InvalidEnvVar(
            "ORDER_BACKEND".to_string(),
            format!("expected webhook, docstore, or memory, got {other}"),
        )),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Session database URL with fallback to the generic `DATABASE_URL`.
fn get_database_url() -> Option<SecretString> {
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
