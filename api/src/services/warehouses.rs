use super::{WarehouseApi, paging};
use crate::client::HttpClient;
use crate::error::Result;
use crate::models::{Warehouse, WarehouseDraft, WarehouseId};
use crate::page::{Page, PageResult};

/// [`WarehouseApi`] over HTTP (`/warehouses`).
#[derive(Debug, Clone)]
pub struct WarehouseService {
    http: HttpClient,
}

impl WarehouseService {
    /// Create the service on top of a shared client.
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl WarehouseApi for WarehouseService {
    async fn list(&self, page: u32, size: u32) -> Result<PageResult<Warehouse>> {
        let page: Page<Warehouse> = self.http.get("/warehouses", &paging(page, size)).await?;
        Ok(page.into())
    }

    async fn available(&self) -> Result<Vec<Warehouse>> {
        self.http.get("/warehouses/available", &[]).await
    }

    async fn get(&self, id: WarehouseId) -> Result<Warehouse> {
        self.http.get(&format!("/warehouses/{id}"), &[]).await
    }

    async fn create(&self, draft: &WarehouseDraft) -> Result<Warehouse> {
        self.http.post("/warehouses", draft).await
    }

    async fn update(&self, id: WarehouseId, draft: &WarehouseDraft) -> Result<Warehouse> {
        self.http.put(&format!("/warehouses/{id}"), draft).await
    }

    async fn delete(&self, id: WarehouseId) -> Result<String> {
        self.http.delete(&format!("/warehouses/{id}")).await
    }
}
