//! # Depot State
//!
//! Client-side state for the Depot warehouse client: one container per REST
//! resource, the session, and the shopping cart.
//!
//! Each container is a [`Reducer`](depot_core::reducer::Reducer) over a state
//! struct. Fetch actions mark the container loading and issue a request
//! through the service trait in the environment; the outcome comes back as an
//! action carrying the request token and is applied only if that token is
//! still the latest. Create, update and delete patch the loaded list in place
//! and leave notices for the shell to show.
//!
//! ## Example
//!
//! ```ignore
//! use depot_runtime::Store;
//! use depot_state::{ContainerEnvironment, ProductAction, ProductReducer, ProductState};
//!
//! let env = ContainerEnvironment::new(ProductService::new(http), Arc::new(SystemClock));
//! let store = Store::new(ProductState::default(), ProductReducer::new(), env);
//!
//! let mut handle = store.send(ProductAction::FetchPage { page: 0, size: 10 }).await?;
//! handle.wait().await;
//! let rows = store.state(|s| s.resource.items().len()).await;
//! ```

use depot_core::environment::Clock;
use std::sync::Arc;

/// Defines a zero-sized reducer type generic over its service trait.
macro_rules! service_reducer {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<A> {
            api: std::marker::PhantomData<fn() -> A>,
        }

        impl<A> $name<A> {
            /// Create the reducer.
            #[must_use]
            pub const fn new() -> Self {
                Self {
                    api: std::marker::PhantomData,
                }
            }
        }

        impl<A> Default for $name<A> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<A> Clone for $name<A> {
            fn clone(&self) -> Self {
                Self::new()
            }
        }

        impl<A> std::fmt::Debug for $name<A> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}
pub(crate) use service_reducer;

pub mod cart;
pub mod dashboard;
pub mod notice;
pub mod order;
pub mod product;
pub mod resource;
pub mod session;
pub mod shipment;
pub mod warehouse;

pub use cart::{Cart, CartLine, CustomerDetails, SHIPPING_FEE};
pub use dashboard::{DashboardAction, DashboardReducer, DashboardState};
pub use notice::{Notice, NoticeLevel, Notices};
pub use order::{OrderAction, OrderReducer, OrderState};
pub use product::{ListMode, ProductAction, ProductReducer, ProductState};
pub use resource::{Entity, LoadStatus, RequestToken, ResourceState, Slot};
pub use session::{SessionAction, SessionEnvironment, SessionReducer, SessionState};
pub use shipment::{ShipmentAction, ShipmentReducer, ShipmentState};
pub use warehouse::{WarehouseAction, WarehouseReducer, WarehouseState};

/// Dependencies of a resource container: its service module and a clock.
pub struct ContainerEnvironment<A> {
    /// Service module the container calls
    pub api: Arc<A>,
    /// Clock used to stamp notices
    pub clock: Arc<dyn Clock>,
}

impl<A> ContainerEnvironment<A> {
    /// Wrap a service module and a clock.
    #[must_use]
    pub fn new(api: A, clock: Arc<dyn Clock>) -> Self {
        Self {
            api: Arc::new(api),
            clock,
        }
    }
}

impl<A> Clone for ContainerEnvironment<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            clock: Arc::clone(&self.clock),
        }
    }
}
