//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::CatalogClient;
use crate::config::{OrderBackendConfig, StorefrontConfig};
use crate::identity::IdentityClient;
use crate::store::{DocStore, MemoryStore, OrderStore, WebhookStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the order store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: Option<PgPool>,
    catalog: CatalogClient,
    orders: Arc<dyn OrderStore>,
    identity: Option<IdentityClient>,
}

impl AppState {
    /// Create a new application state, selecting the order backend from
    /// configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: Option<PgPool>) -> Self {
        let catalog = CatalogClient::new(config.catalog_url.clone());

        let orders: Arc<dyn OrderStore> = match &config.order_backend {
            OrderBackendConfig::Webhook { url } => Arc::new(WebhookStore::new(url.clone())),
            OrderBackendConfig::DocStore {
                base_url,
                api_key,
                collection,
            } => Arc::new(DocStore::new(
                base_url.clone(),
                collection.clone(),
                api_key.clone(),
            )),
            OrderBackendConfig::Memory => Arc::new(MemoryStore::new()),
        };

        let identity = config.identity.as_ref().map(IdentityClient::new);

        Self::with_store(config, pool, catalog, orders, identity)
    }

    /// Create application state from pre-built components.
    ///
    /// Used by tests to inject an in-process order store or a fixed catalog.
    #[must_use]
    pub fn with_store(
        config: StorefrontConfig,
        pool: Option<PgPool>,
        catalog: CatalogClient,
        orders: Arc<dyn OrderStore>,
        identity: Option<IdentityClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                orders,
                identity,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool, if configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the configured order store.
    #[must_use]
    pub fn orders(&self) -> &Arc<dyn OrderStore> {
        &self.inner.orders
    }

    /// Get a reference to the identity provider client, if configured.
    #[must_use]
    pub fn identity(&self) -> Option<&IdentityClient> {
        self.inner.identity.as_ref()
    }
}
