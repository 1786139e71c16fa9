//! The single pending cart line item.
//!
//! The cart holds exactly one line item per session. It is created when a
//! quantity is confirmed on the product detail page, overwritten by any
//! later selection, and deleted exactly once - when an order is
//! successfully persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::product::Product;

/// The pending cart line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// References the selected [`Product`].
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    /// Always at least 1.
    pub quantity: u32,
    pub image: String,
}

impl CartItem {
    /// Create a cart item for `product`. Quantities below 1 are clamped to 1.
    #[must_use]
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: quantity.max(1),
            image: product.image.clone(),
        }
    }

    /// Stepper increment.
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Stepper decrement, floored at 1.
    pub fn decrement(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new("vanilla"),
            name: "Vanilla Bean".to_owned(),
            description: String::new(),
            price: Decimal::new(350, 2),
            image: "vanilla.jpg".to_owned(),
            ingredients: String::new(),
        }
    }

    #[test]
    fn test_quantity_clamped_to_one() {
        let item = CartItem::new(&product(), 0);
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let mut item = CartItem::new(&product(), 1);
        item.decrement();
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_increment_from_one() {
        let mut item = CartItem::new(&product(), 1);
        item.increment();
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_line_total() {
        let item = CartItem::new(&product(), 3);
        assert_eq!(item.line_total(), Decimal::new(1050, 2));
    }
}
