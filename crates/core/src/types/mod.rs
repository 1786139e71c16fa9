//! Core types for Scoop Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod order;
pub mod product;

pub use cart::CartItem;
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{
    CustomerDetails, DeliveryType, Order, OrderDraft, OrderLine, OrderStatus,
};
pub use product::Product;
