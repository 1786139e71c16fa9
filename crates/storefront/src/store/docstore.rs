//! Backend B: a hosted document database.
//!
//! Orders live as documents in a named collection. The server assigns
//! document ids and creation times; listing supports sort-by-creation-time
//! descending. All calls carry the project API key as a bearer token.
//!
//! REST surface:
//! - `POST   {base}/collections/{name}/documents` - create, returns the document
//! - `GET    {base}/collections/{name}/documents?orderBy=createTime&direction=desc`
//! - `GET    {base}/collections/{name}/documents/{id}` - 404 when absent
//! - `PATCH  {base}/collections/{name}/documents/{id}` - partial or full merge

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use scoop_shop_core::{Order, OrderDraft, OrderId, OrderStatus};

use super::{OrderStore, StoreError};

/// Client for the document-database order backend.
#[derive(Clone)]
pub struct DocStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    api_key: SecretString,
}

impl std::fmt::Debug for DocStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStore")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// List response wrapper.
#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Order>,
}

impl DocStore {
    /// Create a client for the collection at `base_url`.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        api_key: SecretString,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            collection: collection.into(),
            api_key,
        }
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.collection
        )
    }

    fn document_url(&self, id: &OrderId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn bearer(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Check status and decode `T`, mapping non-success statuses to
    /// [`StoreError::Api`].
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

#[async_trait]
impl OrderStore for DocStore {
    #[instrument(skip(self, draft))]
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, StoreError> {
        let response = self
            .client
            .post(self.collection_url())
            .bearer_auth(self.bearer())
            .json(draft)
            .send()
            .await?;
        // The server fills in the document id; the reply is the full order.
        Self::decode::<Order>(response).await
    }

    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let response = self
            .client
            .get(self.collection_url())
            .query(&[("orderBy", "createTime"), ("direction", "desc")])
            .bearer_auth(self.bearer())
            .send()
            .await?;
        let list = Self::decode::<DocumentList>(response).await?;
        Ok(list.documents)
    }

    #[instrument(skip(self))]
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        let response = self
            .client
            .get(self.document_url(id))
            .bearer_auth(self.bearer())
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode::<Order>(response).await.map(Some)
    }

    #[instrument(skip(self, order))]
    async fn update_order(&self, order: &Order) -> Result<bool, StoreError> {
        let response = self
            .client
            .patch(self.document_url(&order.id))
            .bearer_auth(self.bearer())
            .json(&order.draft)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::decode::<Order>(response).await?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<bool, StoreError> {
        // Partial merge; the server applies it atomically.
        let response = self
            .client
            .patch(self.document_url(id))
            .bearer_auth(self.bearer())
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::decode::<Order>(response).await?;
        Ok(true)
    }
}
