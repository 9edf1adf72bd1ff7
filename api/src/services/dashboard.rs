use super::DashboardApi;
use crate::client::HttpClient;
use crate::error::Result;
use crate::models::{DashboardStats, Order, Product};

/// Rows shown in the recent-orders panel.
pub const DEFAULT_RECENT_ORDERS: u32 = 5;

/// Rows shown in the top-products panel.
pub const DEFAULT_TOP_PRODUCTS: u32 = 10;

/// [`DashboardApi`] over HTTP (`/dashboard`).
#[derive(Debug, Clone)]
pub struct DashboardService {
    http: HttpClient,
}

impl DashboardService {
    /// Create the service on top of a shared client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl DashboardApi for DashboardService {
    async fn stats(&self) -> Result<DashboardStats> {
        self.http.get("/dashboard/stats", &[]).await
    }

    async fn recent_orders(&self, limit: u32) -> Result<Vec<Order>> {
        self.http
            .get("/dashboard/recent-orders", &[("limit", limit.to_string())])
            .await
    }

    async fn top_products(&self, limit: u32) -> Result<Vec<Product>> {
        self.http
            .get("/dashboard/top-products", &[("limit", limit.to_string())])
            .await
    }
}
