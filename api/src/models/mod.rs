//! Resource types owned by the backend.
//!
//! JSON is camelCase; enum values travel as SCREAMING_SNAKE_CASE strings.
//! Money is [`Decimal`](rust_decimal::Decimal), timestamps are zone-less
//! [`NaiveDateTime`](chrono::NaiveDateTime) as the backend emits them.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw server-assigned id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

resource_id!(
    /// Server-assigned product id
    ProductId
);
resource_id!(
    /// Server-assigned order id
    OrderId
);
resource_id!(
    /// Server-assigned warehouse id
    WarehouseId
);
resource_id!(
    /// Server-assigned shipment id
    ShipmentId
);

/// Error returned when parsing an enum value from its wire name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enum was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

/// Implements `as_str`, `ALL`, `Display` and `FromStr` over the wire names.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name of the variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_uppercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| $crate::models::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

mod dashboard;
mod order;
mod product;
mod shipment;
mod warehouse;

pub use dashboard::DashboardStats;
pub use order::{
    Order, OrderDraft, OrderItem, OrderLineDraft, OrderShipment, OrderStatus, PaymentMethod,
    PaymentStatus,
};
pub use product::{Product, ProductCategory, ProductDraft, ProductStatus, Unit};
pub use shipment::{Shipment, ShipmentStatus};
pub use warehouse::{Warehouse, WarehouseDraft, WarehouseStatus};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_transparent_on_the_wire() {
        assert_eq!(serde_json::to_string(&ProductId::new(7)).unwrap(), "7");
        let id: OrderId = serde_json::from_str("42").unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn wire_enums_parse_case_insensitively() {
        assert_eq!("in_transit".parse::<ShipmentStatus>().unwrap(), ShipmentStatus::InTransit);
        assert_eq!(" BOOKS ".parse::<ProductCategory>().unwrap(), ProductCategory::Books);

        let err = "SPACESHIP".parse::<ProductCategory>().unwrap_err();
        assert_eq!(err.to_string(), "unknown product category: SPACESHIP");
    }
}
