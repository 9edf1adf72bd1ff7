//! # Depot Testing
//!
//! Testing utilities for the Depot client.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`collect_actions`]: execute returned effects without a store
//! - [`InMemoryBackend`]: every service trait over in-memory maps
//! - [`FixedClock`]: deterministic time
//!
//! ## Example
//!
//! ```ignore
//! use depot_testing::{InMemoryBackend, test_clock};
//! use depot_runtime::Store;
//!
//! #[tokio::test]
//! async fn loads_first_page() {
//!     let backend = InMemoryBackend::new();
//!     let store = Store::new(ProductState::default(), ProductReducer::new(), env(backend));
//!
//!     store.send_and_wait_for(ProductAction::FetchPage { page: 0, size: 10 }, is_settled, timeout).await?;
//!     assert_eq!(store.state(|s| s.resource.items().len()).await, 0);
//! }
//! ```

use chrono::{DateTime, Utc};
use depot_core::environment::Clock;

mod backend;

pub use backend::InMemoryBackend;
pub use reducer_test::{ReducerTest, assertions, collect_actions};

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use depot_testing::mocks::FixedClock;
    /// use depot_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// A fixed clock at 2025-01-01 00:00:00 UTC.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }
}

/// Install a test-writer tracing subscriber honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub use mocks::{FixedClock, test_clock};

/// Ready-made drafts that pass the client-side form checks.
pub mod fixtures {
    use depot_api::models::{ProductDraft, WarehouseDraft};
    use rust_decimal::Decimal;

    /// An active warehouse in Ho Chi Minh City holding 100 units.
    #[must_use]
    pub fn warehouse_draft(name: &str) -> WarehouseDraft {
        WarehouseDraft {
            name: name.to_string(),
            address: "1 Tran Hung Dao".to_string(),
            latitude: Some(10.77),
            longitude: Some(106.69),
            capacity: 100,
            ..WarehouseDraft::default()
        }
    }

    /// A product priced at 100 000 with `stock` units on hand.
    #[must_use]
    pub fn stocked_product(name: &str, sku: &str, stock: u32) -> ProductDraft {
        ProductDraft {
            stock_quantity: stock,
            ..ProductDraft::new(name, sku, Decimal::new(100_000, 0))
        }
    }
}
