//! # Depot API
//!
//! Client side of the Depot warehouse backend: the resource types the
//! backend owns, a thin HTTP wrapper, and one service module per resource.
//!
//! Service modules are exposed through traits ([`ProductApi`], [`OrderApi`],
//! [`WarehouseApi`], [`ShipmentApi`], [`DashboardApi`]) so state containers
//! can be driven against an in-memory backend in tests and against
//! [`HttpClient`] in production.
//!
//! ## Example
//!
//! ```ignore
//! use depot_api::{ApiConfig, HttpClient, ProductApi, ProductService};
//!
//! let http = HttpClient::new(&ApiConfig::new("http://localhost:8080/api"))?;
//! http.token().set("eyJhbGciOi...");
//!
//! let products = ProductService::new(http);
//! let page = products.list(0, 10).await?;
//! println!("{} of {} products", page.items.len(), page.total_items);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod page;
pub mod services;
pub mod validation;

pub use client::{HttpClient, TokenSlot};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use format::format_vnd;
pub use page::{Page, PageResult};
pub use services::{
    DashboardApi, DashboardService, OrderApi, OrderService, ProductApi, ProductService,
    ShipmentApi, ShipmentService, WarehouseApi, WarehouseService,
};
pub use validation::{FieldError, FormErrors};
