use super::{OrderApi, paging};
use crate::client::HttpClient;
use crate::error::Result;
use crate::models::{Order, OrderDraft, OrderId, OrderStatus};
use crate::page::{Page, PageResult};

/// [`OrderApi`] over HTTP (`/orders`).
#[derive(Debug, Clone)]
pub struct OrderService {
    http: HttpClient,
}

impl OrderService {
    /// Create the service on top of a shared client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl OrderApi for OrderService {
    async fn list(&self, page: u32, size: u32) -> Result<PageResult<Order>> {
        let page: Page<Order> = self.http.get("/orders", &paging(page, size)).await?;
        Ok(page.into())
    }

    async fn get(&self, id: OrderId) -> Result<Order> {
        self.http.get(&format!("/orders/{id}"), &[]).await
    }

    async fn create(&self, draft: &OrderDraft) -> Result<Order> {
        self.http.post("/orders", draft).await
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        self.http
            .put_query(
                &format!("/orders/{id}/status"),
                &[("status", status.as_str().to_string())],
            )
            .await
    }

    async fn cancel(&self, id: OrderId) -> Result<Order> {
        self.http.put_query(&format!("/orders/{id}/cancel"), &[]).await
    }
}
