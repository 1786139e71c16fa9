//! In-process order store for tests and offline development.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use scoop_shop_core::{Order, OrderDraft, OrderId, OrderStatus};

use super::{OrderStore, StoreError};

/// Order store backed by a `Vec` behind a mutex.
///
/// Assigns sequential `mem-N` ids. Useful as the `memory` backend during
/// development and as the store under the router tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    orders: Mutex<Vec<Order>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing orders (test setup).
    pub fn insert(&self, order: Order) {
        self.orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(order);
    }

    /// Snapshot of everything currently stored (test assertions).
    #[must_use]
    pub fn snapshot(&self) -> Vec<Order> {
        self.orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, StoreError> {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let order = Order {
            id: OrderId::new(format!("mem-{n}")),
            draft: draft.clone(),
        };
        self.insert(order.clone());
        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.snapshot())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.snapshot().into_iter().find(|order| &order.id == id))
    }

    async fn update_order(&self, order: &Order) -> Result<bool, StoreError> {
        let mut orders = self
            .orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match orders.iter_mut().find(|stored| stored.id == order.id) {
            Some(stored) => {
                *stored = order.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<bool, StoreError> {
        let mut orders = self
            .orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match orders.iter_mut().find(|stored| &stored.id == id) {
            Some(stored) => {
                stored.draft.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
