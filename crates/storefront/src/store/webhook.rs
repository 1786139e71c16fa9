//! Backend A: a single POST endpoint in front of a spreadsheet.
//!
//! Every operation is one POST with an action envelope:
//! `{action: "saveOrder" | "getAllOrders" | "getOrderById" | "updateOrder",
//!   order? | orderId?}`, answered by
//! `{success: bool, orders? | order? | error?}`.
//!
//! The webhook cannot assign ids, so the client derives one from the current
//! timestamp at creation time. Ids stay opaque strings everywhere else.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use scoop_shop_core::{Order, OrderDraft, OrderId, OrderStatus};

use super::{OrderStore, StoreError};

/// Client for the spreadsheet webhook order backend.
#[derive(Debug, Clone)]
pub struct WebhookStore {
    client: reqwest::Client,
    endpoint: String,
}

/// Request envelope for the webhook's single endpoint.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<&'a Order>,
    #[serde(rename = "orderId", skip_serializing_if = "Option::is_none")]
    order_id: Option<&'a str>,
}

impl<'a> Envelope<'a> {
    const fn action(action: &'static str) -> Self {
        Self {
            action,
            order: None,
            order_id: None,
        }
    }

    const fn with_order(action: &'static str, order: &'a Order) -> Self {
        Self {
            action,
            order: Some(order),
            order_id: None,
        }
    }

    const fn with_order_id(action: &'static str, order_id: &'a str) -> Self {
        Self {
            action,
            order: None,
            order_id: Some(order_id),
        }
    }
}

/// Response envelope from the webhook.
#[derive(Debug, Deserialize)]
struct Reply {
    success: bool,
    #[serde(default)]
    orders: Option<Vec<Order>>,
    #[serde(default)]
    order: Option<Order>,
    #[serde(default)]
    error: Option<String>,
}

impl WebhookStore {
    /// Create a client for the webhook at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: url.into(),
        }
    }

    /// POST one envelope and parse the reply.
    async fn call(&self, envelope: &Envelope<'_>) -> Result<Reply, StoreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(envelope)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Reply>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    fn failure(reply: &Reply) -> StoreError {
        StoreError::Backend(
            reply
                .error
                .clone()
                .unwrap_or_else(|| "webhook reported failure".to_string()),
        )
    }
}

#[async_trait]
impl OrderStore for WebhookStore {
    #[instrument(skip(self, draft))]
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, StoreError> {
        // The sheet has no id generator; stamp one from the clock.
        let order = Order {
            id: OrderId::new(Utc::now().timestamp_millis().to_string()),
            draft: draft.clone(),
        };

        let reply = self
            .call(&Envelope::with_order("saveOrder", &order))
            .await?;
        if !reply.success {
            return Err(Self::failure(&reply));
        }
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let reply = self.call(&Envelope::action("getAllOrders")).await?;
        if !reply.success {
            return Err(Self::failure(&reply));
        }
        Ok(reply.orders.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        let reply = self
            .call(&Envelope::with_order_id("getOrderById", id.as_str()))
            .await?;
        if reply.success {
            return Ok(reply.order);
        }
        // The webhook reports an unknown id as a failure rather than an
        // empty success; fold that back into Option.
        match &reply.error {
            Some(error) if error.to_lowercase().contains("not found") => Ok(None),
            _ => Err(Self::failure(&reply)),
        }
    }

    #[instrument(skip(self, order))]
    async fn update_order(&self, order: &Order) -> Result<bool, StoreError> {
        let reply = self
            .call(&Envelope::with_order("updateOrder", order))
            .await?;
        Ok(reply.success)
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<bool, StoreError> {
        // Read-then-write: the webhook has no partial update. Two admins
        // racing on the same order can lose one write; accepted limitation.
        let Some(mut order) = self.get_order(id).await? else {
            return Ok(false);
        };
        order.draft.status = status;
        self.update_order(&order).await
    }
}
