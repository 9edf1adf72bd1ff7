use super::{OrderId, ShipmentId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Shipment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    /// Awaiting pickup
    #[default]
    Pending,
    /// Collected from the warehouse
    PickedUp,
    /// On the road
    InTransit,
    /// On the last leg
    OutForDelivery,
    /// Handed over
    Delivered,
    /// Delivery failed
    Failed,
    /// Back at the warehouse
    Returned,
    /// Cancelled
    Cancelled,
}

wire_enum!(ShipmentStatus, "shipment status", {
    Pending => "PENDING",
    PickedUp => "PICKED_UP",
    InTransit => "IN_TRANSIT",
    OutForDelivery => "OUT_FOR_DELIVERY",
    Delivered => "DELIVERED",
    Failed => "FAILED",
    Returned => "RETURNED",
    Cancelled => "CANCELLED",
});

impl ShipmentStatus {
    /// Statuses the dashboard counts as active.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Self::Pending | Self::PickedUp | Self::InTransit | Self::OutForDelivery
        )
    }
}

/// A shipment as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    /// Server-assigned id
    pub id: ShipmentId,
    /// Carrier tracking number
    pub tracking_number: String,
    /// Shipped order
    pub order_id: Option<OrderId>,
    /// Shipped order's number
    pub order_number: Option<String>,
    /// Current status
    pub status: ShipmentStatus,
    /// Vehicle plate
    pub vehicle_license_plate: Option<String>,
    /// Driver display name
    pub driver_name: Option<String>,
    /// Last reported latitude
    pub current_latitude: Option<f64>,
    /// Last reported longitude
    pub current_longitude: Option<f64>,
    /// Last reported speed (km/h)
    pub current_speed: Option<f64>,
    /// Kilometres covered
    pub distance_traveled: Option<f64>,
    /// Kilometres planned
    pub estimated_distance: Option<f64>,
    /// Pickup time
    pub pickup_time: Option<NaiveDateTime>,
    /// Expected arrival
    pub estimated_delivery_time: Option<NaiveDateTime>,
    /// Actual arrival
    pub actual_delivery_time: Option<NaiveDateTime>,
    /// Running late
    #[serde(default)]
    pub is_delayed: bool,
    /// Minutes behind schedule
    pub delay_minutes: Option<i64>,
}

impl Shipment {
    /// Share of the planned distance already covered, in percent.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        match (self.distance_traveled, self.estimated_distance) {
            (Some(done), Some(total)) if total > 0.0 => Some((done / total * 100.0).min(100.0)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tracking_response() {
        let shipment: Shipment = serde_json::from_str(
            r#"{
                "id": 5,
                "trackingNumber": "TRK-5",
                "orderId": 10,
                "status": "OUT_FOR_DELIVERY",
                "distanceTraveled": 30.0,
                "estimatedDistance": 40.0,
                "isDelayed": true,
                "delayMinutes": 15
            }"#,
        )
        .unwrap();

        assert!(shipment.status.is_active());
        assert!(shipment.is_delayed);
        assert_eq!(shipment.progress(), Some(75.0));
    }

    #[test]
    fn delivered_is_not_active() {
        assert!(!ShipmentStatus::Delivered.is_active());
        assert!(ShipmentStatus::PickedUp.is_active());
    }
}
