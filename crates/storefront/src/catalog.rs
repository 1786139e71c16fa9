//! Product catalog accessor.
//!
//! The catalog is a static document fetched over HTTP. Each page handler
//! asks for a [`Catalog`] snapshot and threads it through rendering as a
//! plain value; there is no global mutable catalog. Successful loads are
//! cached briefly (moka); failures resolve to an empty snapshot that says
//! why it is empty, and are never retried within a page view.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::instrument;

use scoop_shop_core::{Product, ProductId};

/// Cache TTL for a successfully fetched catalog.
const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Why a catalog snapshot is (possibly) empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAvailability {
    /// Fetched and parsed.
    Loaded,
    /// No catalog endpoint is configured in this environment.
    Unavailable,
    /// The fetch or parse failed; terminal for this page view.
    FetchFailed,
}

/// An immutable catalog snapshot.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
    availability: CatalogAvailability,
}

impl Catalog {
    fn new(products: Vec<Product>, availability: CatalogAvailability) -> Self {
        Self {
            products: Arc::new(products),
            availability,
        }
    }

    fn empty(availability: CatalogAvailability) -> Self {
        Self::new(Vec::new(), availability)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn availability(&self) -> CatalogAvailability {
        self.availability
    }

    /// Look up one product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }
}

/// Fetches and caches the catalog document.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

#[derive(Debug)]
struct CatalogClientInner {
    client: reqwest::Client,
    url: Option<String>,
    cache: Cache<&'static str, Catalog>,
    fixed: Option<Catalog>,
}

impl CatalogClient {
    /// Create a client for the catalog document at `url`.
    ///
    /// `None` means this environment has no catalog endpoint at all, which
    /// the storefront reports distinctly from a failed fetch.
    #[must_use]
    pub fn new(url: Option<String>) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                url,
                cache: Cache::builder()
                    .max_capacity(1)
                    .time_to_live(CATALOG_TTL)
                    .build(),
                fixed: None,
            }),
        }
    }

    /// A client that always returns the given products without any I/O.
    /// Used by tests and offline development.
    #[must_use]
    pub fn fixed(products: Vec<Product>) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                url: None,
                cache: Cache::builder().max_capacity(1).build(),
                fixed: Some(Catalog::new(products, CatalogAvailability::Loaded)),
            }),
        }
    }

    /// Load a catalog snapshot.
    ///
    /// Never fails: transport and parse problems log and produce an empty
    /// snapshot marked [`CatalogAvailability::FetchFailed`]. Only successful
    /// loads are cached, so the next page view tries again.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Catalog {
        if let Some(fixed) = &self.inner.fixed {
            return fixed.clone();
        }

        let Some(url) = &self.inner.url else {
            return Catalog::empty(CatalogAvailability::Unavailable);
        };

        if let Some(cached) = self.inner.cache.get("catalog").await {
            return cached;
        }

        match self.fetch(url).await {
            Ok(products) => {
                let catalog = Catalog::new(products, CatalogAvailability::Loaded);
                self.inner.cache.insert("catalog", catalog.clone()).await;
                catalog
            }
            Err(e) => {
                tracing::error!(error = %e, url, "Failed to load catalog");
                Catalog::empty(CatalogAvailability::FetchFailed)
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<Product>, CatalogFetchError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogFetchError::Status(status.as_u16()));
        }
        let products = response.json::<Vec<Product>>().await?;
        Ok(products)
    }
}

#[derive(Debug, thiserror::Error)]
enum CatalogFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_owned(),
            description: String::new(),
            price: Decimal::new(300, 2),
            image: String::new(),
            ingredients: String::new(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_environment_is_unavailable() {
        let client = CatalogClient::new(None);
        let catalog = client.load().await;
        assert_eq!(catalog.availability(), CatalogAvailability::Unavailable);
        assert!(catalog.products().is_empty());
    }

    #[tokio::test]
    async fn test_fixed_catalog_lookup() {
        let client = CatalogClient::fixed(vec![product("vanilla"), product("mint")]);
        let catalog = client.load().await;
        assert_eq!(catalog.availability(), CatalogAvailability::Loaded);
        assert_eq!(catalog.products().len(), 2);
        assert!(catalog.product(&ProductId::new("mint")).is_some());
        assert!(catalog.product(&ProductId::new("nope")).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_soft() {
        // Port 1 refuses connections promptly on loopback.
        let client = CatalogClient::new(Some("http://127.0.0.1:1/catalog.json".to_owned()));
        let catalog = client.load().await;
        assert_eq!(catalog.availability(), CatalogAvailability::FetchFailed);
        assert!(catalog.products().is_empty());
    }
}
