//! In-memory backend for driving service-backed containers in tests
//!
//! [`InMemoryBackend`] implements every service trait over plain maps. Ids
//! are assigned from one counter, lists paginate the way the real backend
//! does, and tests can queue failures or slow down a specific page.

use depot_api::models::{
    DashboardStats, Order, OrderDraft, OrderId, OrderItem, OrderStatus, PaymentStatus, Product,
    ProductCategory, ProductDraft, ProductId, Shipment, ShipmentId, ShipmentStatus, Warehouse,
    WarehouseDraft, WarehouseId, WarehouseStatus,
};
use depot_api::{
    ApiError, DashboardApi, OrderApi, PageResult, ProductApi, Result, ShipmentApi, WarehouseApi,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct Data {
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    warehouses: BTreeMap<WarehouseId, Warehouse>,
    shipments: BTreeMap<ShipmentId, Shipment>,
    next_id: i64,
    failures: VecDeque<ApiError>,
    page_delays: HashMap<u32, Duration>,
    calls: Vec<String>,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Backend double shared by every service trait.
///
/// Clones share the same data.
///
/// # Example
///
/// ```
/// use depot_api::ProductApi;
/// use depot_api::models::ProductDraft;
/// use depot_testing::InMemoryBackend;
/// use rust_decimal::Decimal;
///
/// # tokio_test::block_on(async {
/// let backend = InMemoryBackend::new();
/// backend.seed_product(ProductDraft::new("Mouse", "MS-01", Decimal::new(150_000, 0)));
///
/// let page = backend.list(0, 10).await.unwrap();
/// assert_eq!(page.total_items, 1);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    data: Arc<Mutex<Data>>,
}

impl InMemoryBackend {
    /// An empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next request fail with `error`. Queued failures are used in
    /// order, one per request.
    pub fn fail_next(&self, error: ApiError) {
        self.lock().failures.push_back(error);
    }

    /// Delay every list request for `page` by `delay`.
    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.lock().page_delays.insert(page, delay);
    }

    /// Every request received so far, as `METHOD /path`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Number of requests whose description starts with `prefix`.
    #[must_use]
    pub fn call_count(&self, prefix: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    /// Insert a product directly, bypassing request bookkeeping.
    pub fn seed_product(&self, draft: ProductDraft) -> Product {
        let mut data = self.lock();
        let id = ProductId::new(data.next_id());
        let product = product_from(id, draft);
        data.products.insert(id, product.clone());
        product
    }

    /// Insert a warehouse directly.
    pub fn seed_warehouse(&self, draft: WarehouseDraft) -> Warehouse {
        let mut data = self.lock();
        let id = WarehouseId::new(data.next_id());
        let warehouse = warehouse_from(id, draft, 0);
        data.warehouses.insert(id, warehouse.clone());
        warehouse
    }

    /// Insert a shipment directly, optionally attached to an order.
    pub fn seed_shipment(
        &self,
        tracking_number: &str,
        status: ShipmentStatus,
        order_id: Option<OrderId>,
    ) -> Shipment {
        let mut data = self.lock();
        let id = ShipmentId::new(data.next_id());
        let order_number = order_id
            .and_then(|order_id| data.orders.get(&order_id))
            .map(|order| order.order_number.clone());
        let shipment = Shipment {
            id,
            tracking_number: tracking_number.to_string(),
            order_id,
            order_number,
            status,
            vehicle_license_plate: None,
            driver_name: None,
            current_latitude: None,
            current_longitude: None,
            current_speed: None,
            distance_traveled: None,
            estimated_distance: None,
            pickup_time: None,
            estimated_delivery_time: None,
            actual_delivery_time: None,
            is_delayed: false,
            delay_minutes: None,
        };
        data.shipments.insert(id, shipment.clone());
        shipment
    }

    /// Current backend copy of a product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.lock().products.get(&id).cloned()
    }

    /// Current backend copy of an order.
    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.lock().orders.get(&id).cloned()
    }

    /// Record the call and hand out the queued failure and page delay.
    async fn enter(&self, call: String, page: Option<u32>) -> Result<()> {
        let (failure, delay) = {
            let mut data = self.lock();
            tracing::trace!(%call, "in-memory backend request");
            data.calls.push(call);
            let delay = page.and_then(|page| data.page_delays.get(&page).copied());
            (data.failures.pop_front(), delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        failure.map_or(Ok(()), Err)
    }
}

fn not_found(path: String) -> ApiError {
    ApiError::NotFound { path }
}

fn bad_request(message: String) -> ApiError {
    ApiError::Status {
        status: 400,
        message,
    }
}

fn paginate<T: Clone>(rows: Vec<T>, page: u32, size: u32) -> PageResult<T> {
    let size = size.max(1);
    let total_items = rows.len() as u64;
    let total_pages = u32::try_from(total_items.div_ceil(u64::from(size))).unwrap_or(u32::MAX);
    let skip = page as usize * size as usize;

    PageResult {
        items: rows.into_iter().skip(skip).take(size as usize).collect(),
        total_items,
        total_pages,
        current_page: page,
    }
}

fn product_from(id: ProductId, draft: ProductDraft) -> Product {
    Product {
        id,
        name: draft.name,
        sku: draft.sku,
        description: draft.description,
        category: draft.category,
        brand: draft.brand,
        price: draft.price,
        cost_price: draft.cost_price,
        stock_quantity: draft.stock_quantity,
        reorder_level: draft.reorder_level,
        unit: draft.unit,
        weight: draft.weight,
        dimensions: draft.dimensions,
        barcode: draft.barcode,
        image_url: draft.image_url,
        status: draft.status,
        supplier_name: None,
        created_at: None,
    }
}

fn warehouse_from(id: WarehouseId, draft: WarehouseDraft, current_usage: u32) -> Warehouse {
    let mut warehouse = Warehouse {
        id,
        name: draft.name,
        address: draft.address,
        city: draft.city,
        district: draft.district,
        latitude: draft.latitude,
        longitude: draft.longitude,
        capacity: draft.capacity,
        current_usage,
        available_capacity: Some(draft.capacity.saturating_sub(current_usage)),
        usage_percentage: None,
        status: draft.status,
        phone_number: draft.phone_number,
        manager_name: draft.manager_name,
        description: draft.description,
        created_at: None,
    };
    warehouse.usage_percentage = Some(warehouse.usage());
    warehouse
}

impl ProductApi for InMemoryBackend {
    async fn list(&self, page: u32, size: u32) -> Result<PageResult<Product>> {
        self.enter(format!("GET /products?page={page}&size={size}"), Some(page))
            .await?;
        let rows = self.lock().products.values().cloned().collect();
        Ok(paginate(rows, page, size))
    }

    async fn get(&self, id: ProductId) -> Result<Product> {
        let path = format!("/products/{id}");
        self.enter(format!("GET {path}"), None).await?;
        self.product(id).ok_or_else(|| not_found(path))
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Product>> {
        self.enter(format!("GET /products/search?keyword={keyword}"), None)
            .await?;
        let needle = keyword.trim().to_lowercase();
        Ok(self
            .lock()
            .products
            .values()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.sku.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn by_category(
        &self,
        category: ProductCategory,
        page: u32,
        size: u32,
    ) -> Result<PageResult<Product>> {
        self.enter(
            format!("GET /products/category/{category}?page={page}&size={size}"),
            Some(page),
        )
        .await?;
        let rows = self
            .lock()
            .products
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        Ok(paginate(rows, page, size))
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        self.enter("POST /products".to_string(), None).await?;
        let mut data = self.lock();
        if data.products.values().any(|p| p.sku == draft.sku) {
            return Err(bad_request(format!(
                "Product with SKU {} already exists",
                draft.sku
            )));
        }
        let id = ProductId::new(data.next_id());
        let product = product_from(id, draft.clone());
        data.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product> {
        let path = format!("/products/{id}");
        self.enter(format!("PUT {path}"), None).await?;
        let mut data = self.lock();
        let current = data.products.get(&id).ok_or_else(|| not_found(path))?;

        // SKU stays as created.
        let mut updated = product_from(id, draft.clone());
        updated.sku.clone_from(&current.sku);
        updated.supplier_name.clone_from(&current.supplier_name);
        updated.created_at = current.created_at;

        data.products.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: ProductId) -> Result<String> {
        let path = format!("/products/{id}");
        self.enter(format!("DELETE {path}"), None).await?;
        self.lock()
            .products
            .remove(&id)
            .map(|_| "Product deleted successfully".to_string())
            .ok_or_else(|| not_found(path))
    }
}

impl OrderApi for InMemoryBackend {
    async fn list(&self, page: u32, size: u32) -> Result<PageResult<Order>> {
        self.enter(format!("GET /orders?page={page}&size={size}"), Some(page))
            .await?;
        let rows = self.lock().orders.values().rev().cloned().collect();
        Ok(paginate(rows, page, size))
    }

    async fn get(&self, id: OrderId) -> Result<Order> {
        let path = format!("/orders/{id}");
        self.enter(format!("GET {path}"), None).await?;
        self.order(id).ok_or_else(|| not_found(path))
    }

    async fn create(&self, draft: &OrderDraft) -> Result<Order> {
        self.enter("POST /orders".to_string(), None).await?;
        let mut data = self.lock();

        let warehouse_id = draft
            .warehouse_id
            .ok_or_else(|| bad_request("Warehouse is required".to_string()))?;
        let warehouse_name = data
            .warehouses
            .get(&warehouse_id)
            .map(|w| w.name.clone())
            .ok_or_else(|| not_found(format!("/warehouses/{warehouse_id}")))?;

        let mut items = Vec::with_capacity(draft.items.len());
        for line in &draft.items {
            let product = data
                .products
                .get(&line.product_id)
                .ok_or_else(|| bad_request(format!("Product not found: {}", line.product_id)))?;
            if product.stock_quantity < line.quantity {
                return Err(bad_request(format!(
                    "Insufficient stock for product: {}. Available: {}, Requested: {}",
                    product.name, product.stock_quantity, line.quantity
                )));
            }
            items.push(OrderItem {
                id: None,
                product_id: product.id,
                product_name: product.name.clone(),
                product_sku: product.sku.clone(),
                quantity: line.quantity,
                price: line.price,
                discount: Some(Decimal::ZERO),
                subtotal: Some(line.price * Decimal::from(line.quantity)),
            });
        }

        for line in &draft.items {
            if let Some(product) = data.products.get_mut(&line.product_id) {
                product.stock_quantity -= line.quantity;
            }
        }

        let id = OrderId::new(data.next_id());
        let subtotal = items.iter().filter_map(|item| item.subtotal).sum();
        let order = Order {
            id,
            order_number: format!("ORD-{:06}", id.get()),
            warehouse_name: Some(warehouse_name),
            status: OrderStatus::Pending,
            customer_name: Some(draft.customer_name.clone()),
            customer_email: draft.customer_email.clone(),
            customer_phone: draft.customer_phone.clone(),
            shipping_address: Some(draft.shipping_address.clone()),
            subtotal: Some(subtotal),
            shipping_fee: Some(draft.total_amount - subtotal),
            discount: Some(Decimal::ZERO),
            tax: Some(Decimal::ZERO),
            total_amount: draft.total_amount,
            payment_method: Some(draft.payment_method),
            payment_status: PaymentStatus::Pending,
            total_items: draft.total_items(),
            order_date: None,
            expected_delivery_date: None,
            actual_delivery_date: None,
            items,
            shipment: None,
        };
        data.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        let path = format!("/orders/{id}/status");
        self.enter(format!("PUT {path}?status={status}"), None).await?;
        set_order_status(&mut self.lock(), id, status, path)
    }

    async fn cancel(&self, id: OrderId) -> Result<Order> {
        let path = format!("/orders/{id}/cancel");
        self.enter(format!("PUT {path}"), None).await?;
        set_order_status(&mut self.lock(), id, OrderStatus::Cancelled, path)
    }
}

/// The backend only refuses to move orders out of DELIVERED or CANCELLED.
fn set_order_status(data: &mut Data, id: OrderId, status: OrderStatus, path: String) -> Result<Order> {
    let order = data.orders.get_mut(&id).ok_or_else(|| not_found(path))?;
    if matches!(order.status, OrderStatus::Delivered | OrderStatus::Cancelled) {
        return Err(bad_request(format!("Cannot change status from {}", order.status)));
    }
    order.status = status;
    let order = order.clone();

    if status == OrderStatus::Cancelled {
        for item in &order.items {
            if let Some(product) = data.products.get_mut(&item.product_id) {
                product.stock_quantity += item.quantity;
            }
        }
    }
    Ok(order)
}

impl WarehouseApi for InMemoryBackend {
    async fn list(&self, page: u32, size: u32) -> Result<PageResult<Warehouse>> {
        self.enter(format!("GET /warehouses?page={page}&size={size}"), Some(page))
            .await?;
        let rows = self.lock().warehouses.values().cloned().collect();
        Ok(paginate(rows, page, size))
    }

    async fn available(&self) -> Result<Vec<Warehouse>> {
        self.enter("GET /warehouses/available".to_string(), None)
            .await?;
        Ok(self
            .lock()
            .warehouses
            .values()
            .filter(|w| w.status == WarehouseStatus::Active && w.current_usage < w.capacity)
            .cloned()
            .collect())
    }

    async fn get(&self, id: WarehouseId) -> Result<Warehouse> {
        let path = format!("/warehouses/{id}");
        self.enter(format!("GET {path}"), None).await?;
        self.lock()
            .warehouses
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    async fn create(&self, draft: &WarehouseDraft) -> Result<Warehouse> {
        self.enter("POST /warehouses".to_string(), None).await?;
        let mut data = self.lock();
        let id = WarehouseId::new(data.next_id());
        let warehouse = warehouse_from(id, draft.clone(), 0);
        data.warehouses.insert(id, warehouse.clone());
        Ok(warehouse)
    }

    async fn update(&self, id: WarehouseId, draft: &WarehouseDraft) -> Result<Warehouse> {
        let path = format!("/warehouses/{id}");
        self.enter(format!("PUT {path}"), None).await?;
        let mut data = self.lock();
        let usage = data
            .warehouses
            .get(&id)
            .map(|w| w.current_usage)
            .ok_or_else(|| not_found(path))?;
        let warehouse = warehouse_from(id, draft.clone(), usage);
        data.warehouses.insert(id, warehouse.clone());
        Ok(warehouse)
    }

    async fn delete(&self, id: WarehouseId) -> Result<String> {
        let path = format!("/warehouses/{id}");
        self.enter(format!("DELETE {path}"), None).await?;
        self.lock()
            .warehouses
            .remove(&id)
            .map(|_| "Warehouse deleted successfully".to_string())
            .ok_or_else(|| not_found(path))
    }
}

impl ShipmentApi for InMemoryBackend {
    async fn track(&self, tracking_number: &str) -> Result<Shipment> {
        let tracking_number = tracking_number.trim();
        let path = format!("/shipments/tracking/{tracking_number}");
        self.enter(format!("GET {path}"), None).await?;
        self.lock()
            .shipments
            .values()
            .find(|s| s.tracking_number == tracking_number)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    async fn active(&self) -> Result<Vec<Shipment>> {
        self.enter("GET /shipments/active".to_string(), None).await?;
        Ok(self
            .lock()
            .shipments
            .values()
            .filter(|s| s.status.is_active())
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: ShipmentId, status: ShipmentStatus) -> Result<Shipment> {
        let path = format!("/shipments/{id}/status");
        self.enter(format!("PATCH {path}?status={status}"), None)
            .await?;
        let mut data = self.lock();
        let shipment = data.shipments.get_mut(&id).ok_or_else(|| not_found(path))?;
        shipment.status = status;
        Ok(shipment.clone())
    }
}

impl DashboardApi for InMemoryBackend {
    async fn stats(&self) -> Result<DashboardStats> {
        self.enter("GET /dashboard/stats".to_string(), None).await?;
        let data = self.lock();
        Ok(DashboardStats {
            total_orders: data.orders.len() as u64,
            pending_orders: data
                .orders
                .values()
                .filter(|o| o.status == OrderStatus::Pending)
                .count() as u64,
            low_stock_items: data.products.values().filter(|p| p.needs_reorder()).count() as u64,
            active_shipments: data
                .shipments
                .values()
                .filter(|s| s.status.is_active())
                .count() as u64,
            total_products: data.products.len() as u64,
        })
    }

    async fn recent_orders(&self, limit: u32) -> Result<Vec<Order>> {
        self.enter(format!("GET /dashboard/recent-orders?limit={limit}"), None)
            .await?;
        Ok(self
            .lock()
            .orders
            .values()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn top_products(&self, limit: u32) -> Result<Vec<Product>> {
        self.enter(format!("GET /dashboard/top-products?limit={limit}"), None)
            .await?;
        let data = self.lock();

        let mut sold: HashMap<ProductId, u32> = HashMap::new();
        for item in data.orders.values().flat_map(|o| &o.items) {
            *sold.entry(item.product_id).or_default() += item.quantity;
        }

        let mut products: Vec<&Product> = data.products.values().collect();
        products.sort_by_key(|p| std::cmp::Reverse(sold.get(&p.id).copied().unwrap_or(0)));
        Ok(products
            .into_iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
