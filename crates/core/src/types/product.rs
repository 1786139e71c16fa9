//! Catalog product records.
//!
//! Products are externally sourced from a static catalog document and are
//! read-only for the lifetime of a page view. Within one catalog the `id`
//! is unique.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// A product from the catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier, unique within the catalog.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Short marketing description.
    #[serde(default)]
    pub description: String,
    /// Unit price. Non-negative.
    pub price: Decimal,
    /// Image URI.
    #[serde(default)]
    pub image: String,
    /// Ingredient list, free text.
    #[serde(default)]
    pub ingredients: String,
}
