use super::{OrderId, ProductId, ShipmentId, ShipmentStatus, WarehouseId};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::validation::{self, FormErrors};
use validator::{Validate, ValidationError};

/// Order lifecycle status
///
/// Orders only move forward: `PENDING → CONFIRMED → PROCESSING → PACKED →
/// READY_TO_SHIP → SHIPPED → DELIVERED → COMPLETED`. Cancelling is possible
/// until the order ships; a return is possible once it has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation
    #[default]
    Pending,
    /// Accepted by the warehouse
    Confirmed,
    /// Being picked
    Processing,
    /// Packed
    Packed,
    /// Waiting for a carrier
    ReadyToShip,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Closed
    Completed,
    /// Cancelled before shipping
    Cancelled,
    /// Sent back after delivery
    Returned,
}

wire_enum!(OrderStatus, "order status", {
    Pending => "PENDING",
    Confirmed => "CONFIRMED",
    Processing => "PROCESSING",
    Packed => "PACKED",
    ReadyToShip => "READY_TO_SHIP",
    Shipped => "SHIPPED",
    Delivered => "DELIVERED",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
    Returned => "RETURNED",
});

impl OrderStatus {
    /// Position on the forward path, `None` for the two exits.
    const fn rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Processing => Some(2),
            Self::Packed => Some(3),
            Self::ReadyToShip => Some(4),
            Self::Shipped => Some(5),
            Self::Delivered => Some(6),
            Self::Completed => Some(7),
            Self::Cancelled | Self::Returned => None,
        }
    }

    /// No further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Returned)
    }

    /// Whether an order in `self` may move to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self.rank(), next) {
            (None, _) => false,
            (Some(from), Self::Cancelled) => from < 5,
            (Some(from), Self::Returned) => from == 6,
            (Some(from), next) => next.rank().is_some_and(|to| to > from),
        }
    }

    /// Every status reachable from `self`, in lifecycle order.
    #[must_use]
    pub fn next_statuses(self) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }
}

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cash,
    /// Card
    Card,
    /// Bank transfer
    Transfer,
}

wire_enum!(PaymentMethod, "payment method", {
    Cash => "CASH",
    Card => "CARD",
    Transfer => "TRANSFER",
});

/// Payment progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Not yet paid
    #[default]
    Pending,
    /// Paid
    Paid,
    /// Refunded
    Refunded,
}

wire_enum!(PaymentStatus, "payment status", {
    Pending => "PENDING",
    Paid => "PAID",
    Refunded => "REFUNDED",
});

/// One line of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Line id
    pub id: Option<i64>,
    /// Ordered product
    pub product_id: ProductId,
    /// Product name at order time
    #[serde(default)]
    pub product_name: String,
    /// Product SKU at order time
    #[serde(default)]
    pub product_sku: String,
    /// Units ordered
    pub quantity: u32,
    /// Unit price
    pub price: Decimal,
    /// Line discount
    pub discount: Option<Decimal>,
    /// Line total
    pub subtotal: Option<Decimal>,
}

/// Shipment attached to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderShipment {
    /// Shipment id
    pub id: ShipmentId,
    /// Carrier tracking number
    pub tracking_number: String,
    /// Shipment status
    pub status: ShipmentStatus,
    /// Expected arrival
    pub estimated_delivery_time: Option<NaiveDateTime>,
}

/// An order as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned id
    pub id: OrderId,
    /// Human-facing order number
    pub order_number: String,
    /// Fulfilling warehouse
    pub warehouse_name: Option<String>,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Customer name snapshot
    pub customer_name: Option<String>,
    /// Customer email snapshot
    pub customer_email: Option<String>,
    /// Customer phone snapshot
    pub customer_phone: Option<String>,
    /// Delivery address
    pub shipping_address: Option<String>,
    /// Sum of line totals
    pub subtotal: Option<Decimal>,
    /// Shipping fee
    pub shipping_fee: Option<Decimal>,
    /// Order discount
    pub discount: Option<Decimal>,
    /// Tax
    pub tax: Option<Decimal>,
    /// Amount due
    pub total_amount: Decimal,
    /// Payment method
    pub payment_method: Option<PaymentMethod>,
    /// Payment progress
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Units across all lines
    #[serde(default)]
    pub total_items: u32,
    /// Placement time
    pub order_date: Option<NaiveDateTime>,
    /// Promised delivery
    pub expected_delivery_date: Option<NaiveDateTime>,
    /// Actual delivery
    pub actual_delivery_date: Option<NaiveDateTime>,
    /// Order lines
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Attached shipment
    pub shipment: Option<OrderShipment>,
}

/// One line of a new order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDraft {
    /// Product to order
    pub product_id: ProductId,
    /// Units (at least 1)
    pub quantity: u32,
    /// Unit price
    pub price: Decimal,
}

/// Fields submitted to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Customer name
    pub customer_name: String,
    /// Customer email
    #[validate(email(message = "Email is not valid"))]
    pub customer_email: Option<String>,
    /// Customer phone
    pub customer_phone: Option<String>,
    /// Delivery address
    pub shipping_address: String,
    /// Fulfilling warehouse
    pub warehouse_id: Option<WarehouseId>,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Free-form notes
    pub notes: Option<String>,
    /// Order lines
    #[validate(
        length(min = 1, message = "Please add at least one product"),
        custom = "positive_quantities"
    )]
    pub items: Vec<OrderLineDraft>,
    /// Amount due as computed client-side
    pub total_amount: Decimal,
}

fn positive_quantities(items: &[OrderLineDraft]) -> Result<(), ValidationError> {
    if items.iter().any(|line| line.quantity == 0) {
        let mut error = ValidationError::new("quantity");
        error.message = Some("Quantity must be greater than 0".into());
        return Err(error);
    }
    Ok(())
}

impl OrderDraft {
    /// Run the form checks, including the warehouse choice.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] listing every rejected field.
    pub fn check(&self) -> Result<(), FormErrors> {
        validation::check_with(self, |errors| {
            if self.warehouse_id.is_none() {
                errors.add("warehouseId", "Please select a warehouse");
            }
        })
    }

    /// Units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }
}
