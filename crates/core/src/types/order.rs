//! Durable order records.
//!
//! An order carries exactly one line item. Its wire form is camelCase JSON
//! (`customerName`, `orderDate`, ...) because both order backends speak that
//! dialect. The `id` is assigned by the backend at creation time, which is
//! why [`OrderDraft`] exists as the id-less form.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::cart::CartItem;
use crate::types::id::{OrderId, ProductId};

/// Order lifecycle status.
///
/// The only modeled transition is `pending -> completed`; nothing ever moves
/// an order back to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

impl OrderStatus {
    /// Whether the admin "mark completed" action applies.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How the customer wants to receive the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    /// The form's default-checked option.
    #[default]
    Pickup,
    Delivery,
}

impl std::fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pickup => write!(f, "pickup"),
            Self::Delivery => write!(f, "delivery"),
        }
    }
}

impl std::str::FromStr for DeliveryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            _ => Err(format!("invalid delivery type: {s}")),
        }
    }
}

/// A persisted order line. Image is intentionally omitted from the durable
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Customer contact details collected by the order form.
#[derive(Debug, Clone, Default)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Optional; not independently validated.
    pub address: Option<String>,
}

impl CustomerDetails {
    /// Display names of required fields that are empty, in form order.
    ///
    /// Whitespace-only input counts as missing. The caller reports all
    /// missing fields in a single aggregated message.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Name");
        }
        if self.email.trim().is_empty() {
            missing.push("Email");
        }
        if self.phone.trim().is_empty() {
            missing.push("Phone");
        }
        missing
    }
}

/// An order without an id, ready to hand to an order backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    pub delivery_type: DeliveryType,
    /// Exactly one line item.
    pub items: Vec<OrderLine>,
    /// Always `price * quantity` of the single line item.
    pub total: Decimal,
    /// Client-generated creation timestamp, serialized as ISO-8601.
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl OrderDraft {
    /// Build a draft from the pending cart item and the submitted form.
    ///
    /// Computes `total`, stamps `order_date` with the current time, and
    /// starts `pending`.
    #[must_use]
    pub fn new(details: CustomerDetails, delivery_type: DeliveryType, item: &CartItem) -> Self {
        Self {
            customer_name: details.name,
            customer_email: details.email,
            customer_phone: details.phone,
            customer_address: details
                .address
                .filter(|address| !address.trim().is_empty()),
            delivery_type,
            total: item.line_total(),
            items: vec![OrderLine::from(item)],
            order_date: Utc::now(),
            status: OrderStatus::Pending,
        }
    }
}

/// A persisted order: an [`OrderDraft`] plus its backend-assigned id.
///
/// The id is opaque. One backend fills it with a timestamp-derived integer,
/// the other with a server-generated document name; callers must never
/// assume numeric ordering or parseability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(flatten)]
    pub draft: OrderDraft,
}

impl Order {
    /// Whether the admin "mark completed" action applies.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.draft.status.is_pending()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::product::Product;

    fn cart_item(quantity: u32) -> CartItem {
        let product = Product {
            id: ProductId::new("straw"),
            name: "Strawberry".to_owned(),
            description: String::new(),
            price: Decimal::new(425, 2),
            image: "straw.jpg".to_owned(),
            ingredients: String::new(),
        };
        CartItem::new(&product, quantity)
    }

    fn details() -> CustomerDetails {
        CustomerDetails {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: "555-0100".to_owned(),
            address: None,
        }
    }

    #[test]
    fn test_total_is_price_times_quantity() {
        for quantity in [1, 2, 7, 100] {
            let draft = OrderDraft::new(details(), DeliveryType::Pickup, &cart_item(quantity));
            let line = &draft.items[0];
            assert_eq!(draft.total, line.price * Decimal::from(line.quantity));
        }
    }

    #[test]
    fn test_draft_has_exactly_one_line_without_image() {
        let draft = OrderDraft::new(details(), DeliveryType::Delivery, &cart_item(2));
        assert_eq!(draft.items.len(), 1);
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json["items"][0].get("image").is_none());
    }

    #[test]
    fn test_draft_starts_pending() {
        let draft = OrderDraft::new(details(), DeliveryType::Pickup, &cart_item(1));
        assert_eq!(draft.status, OrderStatus::Pending);
    }

    #[test]
    fn test_blank_address_dropped() {
        let mut d = details();
        d.address = Some("   ".to_owned());
        let draft = OrderDraft::new(d, DeliveryType::Pickup, &cart_item(1));
        assert!(draft.customer_address.is_none());
    }

    #[test]
    fn test_missing_fields_exact() {
        let all_present = details();
        assert!(all_present.missing_fields().is_empty());

        let missing_two = CustomerDetails {
            name: " ".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: String::new(),
            address: None,
        };
        assert_eq!(missing_two.missing_fields(), vec!["Name", "Phone"]);

        let missing_all = CustomerDetails::default();
        assert_eq!(missing_all.missing_fields(), vec!["Name", "Email", "Phone"]);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let draft = OrderDraft::new(details(), DeliveryType::Pickup, &cart_item(1));
        let order = Order {
            id: OrderId::new("1714070000000"),
            draft,
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], "1714070000000");
        assert_eq!(json["customerName"], "Ada");
        assert_eq!(json["deliveryType"], "pickup");
        assert_eq!(json["status"], "pending");
        assert!(json["orderDate"].is_string());
    }

    #[test]
    fn test_status_one_way_helpers() {
        assert!(OrderStatus::Pending.is_pending());
        assert!(!OrderStatus::Completed.is_pending());
        assert_eq!("completed".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert!("cancelled".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_deserializes_numeric_id() {
        // Backend A stores timestamp integers; tolerate them on the way back in.
        let json = r#"{
            "id": 1714070000000,
            "customerName": "Ada",
            "customerEmail": "ada@example.com",
            "customerPhone": "555-0100",
            "deliveryType": "delivery",
            "items": [{"id": "straw", "name": "Strawberry", "price": "4.25", "quantity": 2}],
            "total": "8.50",
            "orderDate": "2026-04-25T18:00:00Z",
            "status": "pending"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id.as_str(), "1714070000000");
        assert_eq!(order.draft.items[0].quantity, 2);
        assert!(order.is_pending());
    }
}
