use super::ShipmentApi;
use crate::client::HttpClient;
use crate::error::Result;
use crate::models::{Shipment, ShipmentId, ShipmentStatus};

/// [`ShipmentApi`] over HTTP (`/shipments`).
#[derive(Debug, Clone)]
pub struct ShipmentService {
    http: HttpClient,
}

impl ShipmentService {
    /// Create the service on top of a shared client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl ShipmentApi for ShipmentService {
    async fn track(&self, tracking_number: &str) -> Result<Shipment> {
        self.http
            .get(&format!("/shipments/tracking/{}", tracking_number.trim()), &[])
            .await
    }

    async fn active(&self) -> Result<Vec<Shipment>> {
        self.http.get("/shipments/active", &[]).await
    }

    async fn update_status(&self, id: ShipmentId, status: ShipmentStatus) -> Result<Shipment> {
        self.http
            .patch_query(
                &format!("/shipments/{id}/status"),
                &[("status", status.as_str().to_string())],
            )
            .await
    }
}
