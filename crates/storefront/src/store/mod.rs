//! Order persistence behind a swappable backend seam.
//!
//! The storefront and the admin dashboard both talk to [`OrderStore`]; which
//! concrete backend sits behind it is decided once, from configuration, in
//! [`crate::state::AppState`]. The two production backends are a spreadsheet
//! webhook ([`WebhookStore`]) and a hosted document database ([`DocStore`]);
//! [`MemoryStore`] backs tests and offline development.

mod docstore;
mod memory;
mod webhook;

pub use docstore::DocStore;
pub use memory::MemoryStore;
pub use webhook::WebhookStore;

use async_trait::async_trait;
use thiserror::Error;

use scoop_shop_core::{Order, OrderDraft, OrderId, OrderStatus};

/// Errors surfaced by order backends.
///
/// Handlers convert these to a user-visible message and an unchanged page;
/// backend trouble never crashes a request.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Backend replied but reported a failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// Failed to parse a backend response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// The persistence seam shared by every order backend.
///
/// Identifier assignment differs per backend (client timestamp vs server
/// document id), so creation takes an [`OrderDraft`] and returns the stored
/// [`Order`] with its id filled in. Listing order is unspecified; callers
/// sort by `order_date` themselves.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new durable order record and return it with its assigned id.
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, StoreError>;

    /// Fetch every persisted order, in backend-defined order.
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Fetch one order by id.
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError>;

    /// Replace a full record by id. Returns `false` if the id is unknown.
    async fn update_order(&self, order: &Order) -> Result<bool, StoreError>;

    /// Transition an order's status. Atomic from the caller's point of view;
    /// the webhook backend implements it as read-then-write and accepts the
    /// resulting lost-update window under concurrent admins. Returns `false`
    /// if the id is unknown.
    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<bool, StoreError>;
}
