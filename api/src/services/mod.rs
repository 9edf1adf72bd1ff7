//! One service module per backend resource.
//!
//! Each trait method issues exactly one request and returns the unwrapped
//! body. Failures propagate once; nothing here retries.

mod dashboard;
mod orders;
mod products;
mod shipments;
mod warehouses;

pub use dashboard::{DEFAULT_RECENT_ORDERS, DEFAULT_TOP_PRODUCTS, DashboardService};
pub use orders::OrderService;
pub use products::ProductService;
pub use shipments::ShipmentService;
pub use warehouses::WarehouseService;

use crate::error::Result;
use crate::models::{
    DashboardStats, Order, OrderDraft, OrderId, OrderStatus, Product, ProductCategory,
    ProductDraft, ProductId, Shipment, ShipmentId, ShipmentStatus, Warehouse, WarehouseDraft,
    WarehouseId,
};
use crate::page::PageResult;
use std::future::Future;

/// Product catalogue operations.
pub trait ProductApi: Send + Sync {
    /// One page of products.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn list(
        &self,
        page: u32,
        size: u32,
    ) -> impl Future<Output = Result<PageResult<Product>>> + Send;

    /// One product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) for an unknown id.
    fn get(&self, id: ProductId) -> impl Future<Output = Result<Product>> + Send;

    /// Products whose name or SKU matches `keyword` (unpaginated).
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn search(&self, keyword: &str) -> impl Future<Output = Result<Vec<Product>>> + Send;

    /// One page of products in `category`.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn by_category(
        &self,
        category: ProductCategory,
        page: u32,
        size: u32,
    ) -> impl Future<Output = Result<PageResult<Product>>> + Send;

    /// Create a product; the backend assigns the id.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn create(&self, draft: &ProductDraft) -> impl Future<Output = Result<Product>> + Send;

    /// Replace the writable fields of a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) for an unknown id.
    fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<Product>> + Send;

    /// Delete a product, returning the backend's confirmation text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) for an unknown id.
    fn delete(&self, id: ProductId) -> impl Future<Output = Result<String>> + Send;
}

/// Order operations.
pub trait OrderApi: Send + Sync {
    /// One page of orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn list(&self, page: u32, size: u32)
    -> impl Future<Output = Result<PageResult<Order>>> + Send;

    /// One order by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) for an unknown id.
    fn get(&self, id: OrderId) -> impl Future<Output = Result<Order>> + Send;

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure (e.g. insufficient stock).
    fn create(&self, draft: &OrderDraft) -> impl Future<Output = Result<Order>> + Send;

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> impl Future<Output = Result<Order>> + Send;

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn cancel(&self, id: OrderId) -> impl Future<Output = Result<Order>> + Send;
}

/// Warehouse operations.
pub trait WarehouseApi: Send + Sync {
    /// One page of warehouses.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn list(
        &self,
        page: u32,
        size: u32,
    ) -> impl Future<Output = Result<PageResult<Warehouse>>> + Send;

    /// Warehouses currently accepting goods.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn available(&self) -> impl Future<Output = Result<Vec<Warehouse>>> + Send;

    /// One warehouse by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) for an unknown id.
    fn get(&self, id: WarehouseId) -> impl Future<Output = Result<Warehouse>> + Send;

    /// Create a warehouse; the backend assigns the id.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn create(&self, draft: &WarehouseDraft) -> impl Future<Output = Result<Warehouse>> + Send;

    /// Replace the writable fields of a warehouse.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) for an unknown id.
    fn update(
        &self,
        id: WarehouseId,
        draft: &WarehouseDraft,
    ) -> impl Future<Output = Result<Warehouse>> + Send;

    /// Delete a warehouse, returning the backend's confirmation text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) for an unknown id.
    fn delete(&self, id: WarehouseId) -> impl Future<Output = Result<String>> + Send;
}

/// Shipment tracking operations.
pub trait ShipmentApi: Send + Sync {
    /// Look a shipment up by tracking number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::ApiError::NotFound) for an unknown number.
    fn track(&self, tracking_number: &str) -> impl Future<Output = Result<Shipment>> + Send;

    /// Shipments still on their way.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn active(&self) -> impl Future<Output = Result<Vec<Shipment>>> + Send;

    /// Move a shipment to `status`.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn update_status(
        &self,
        id: ShipmentId,
        status: ShipmentStatus,
    ) -> impl Future<Output = Result<Shipment>> + Send;
}

/// Dashboard read models.
pub trait DashboardApi: Send + Sync {
    /// Headline counters.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn stats(&self) -> impl Future<Output = Result<DashboardStats>> + Send;

    /// Most recent `limit` orders.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn recent_orders(&self, limit: u32) -> impl Future<Output = Result<Vec<Order>>> + Send;

    /// Best-selling `limit` products.
    ///
    /// # Errors
    ///
    /// Returns the transport or HTTP failure as [`ApiError`](crate::ApiError).
    fn top_products(&self, limit: u32) -> impl Future<Output = Result<Vec<Product>>> + Send;
}

fn paging(page: u32, size: u32) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("size", size.to_string())]
}
