//! Dashboard container: headline counters, recent orders and top products.
//!
//! The three read models load independently; each has its own status, so a
//! failing counter endpoint does not blank the order list.

use crate::ContainerEnvironment;
use crate::resource::{RequestToken, Slot};
use depot_api::models::{DashboardStats, Order, Product};
use depot_api::services::{DEFAULT_RECENT_ORDERS, DEFAULT_TOP_PRODUCTS};
use depot_api::{ApiError, DashboardApi};
use depot_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<DashboardAction>; 4]>;

/// Dashboard read models.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Headline counters
    pub stats: Slot<DashboardStats>,
    /// Most recent orders
    pub recent_orders: Slot<Vec<Order>>,
    /// Best-selling products
    pub top_products: Slot<Vec<Product>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            stats: Slot::new("dashboard.stats"),
            recent_orders: Slot::new("dashboard.recent_orders"),
            top_products: Slot::new("dashboard.top_products"),
        }
    }
}

impl DashboardState {
    /// True while any of the three fetches is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.stats.is_loading() || self.recent_orders.is_loading() || self.top_products.is_loading()
    }
}

/// Dashboard container actions.
#[derive(Debug, Clone)]
pub enum DashboardAction {
    /// Load everything with the default limits
    Refresh,
    /// Load the counters
    FetchStats,
    /// Load the latest `limit` orders
    FetchRecentOrders {
        /// Orders to show
        limit: u32,
    },
    /// Load the best-selling `limit` products
    FetchTopProducts {
        /// Products to show
        limit: u32,
    },
    /// Outcome of [`DashboardAction::FetchStats`]
    StatsLoaded {
        /// Token the fetch was issued with
        token: RequestToken,
        /// Counters or failure
        result: Result<DashboardStats, ApiError>,
    },
    /// Outcome of [`DashboardAction::FetchRecentOrders`]
    RecentOrdersLoaded {
        /// Token the fetch was issued with
        token: RequestToken,
        /// Orders or failure
        result: Result<Vec<Order>, ApiError>,
    },
    /// Outcome of [`DashboardAction::FetchTopProducts`]
    TopProductsLoaded {
        /// Token the fetch was issued with
        token: RequestToken,
        /// Products or failure
        result: Result<Vec<Product>, ApiError>,
    },
}

crate::service_reducer!(
    /// Reducer for [`DashboardState`], generic over the dashboard service.
    DashboardReducer
);

impl<A: DashboardApi + 'static> DashboardReducer<A> {
    fn fetch_stats(state: &mut DashboardState, env: &ContainerEnvironment<A>) -> Effect<DashboardAction> {
        let token = state.stats.begin_fetch();
        let api = Arc::clone(&env.api);
        Effect::future(async move {
            let result = api.stats().await;
            Some(DashboardAction::StatsLoaded { token, result })
        })
    }

    fn fetch_recent_orders(
        state: &mut DashboardState,
        env: &ContainerEnvironment<A>,
        limit: u32,
    ) -> Effect<DashboardAction> {
        let token = state.recent_orders.begin_fetch();
        let api = Arc::clone(&env.api);
        Effect::future(async move {
            let result = api.recent_orders(limit).await;
            Some(DashboardAction::RecentOrdersLoaded { token, result })
        })
    }

    fn fetch_top_products(
        state: &mut DashboardState,
        env: &ContainerEnvironment<A>,
        limit: u32,
    ) -> Effect<DashboardAction> {
        let token = state.top_products.begin_fetch();
        let api = Arc::clone(&env.api);
        Effect::future(async move {
            let result = api.top_products(limit).await;
            Some(DashboardAction::TopProductsLoaded { token, result })
        })
    }
}

impl<A: DashboardApi + 'static> Reducer for DashboardReducer<A> {
    type State = DashboardState;
    type Action = DashboardAction;
    type Environment = ContainerEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            DashboardAction::Refresh => smallvec![Effect::merge(vec![
                Self::fetch_stats(state, env),
                Self::fetch_recent_orders(state, env, DEFAULT_RECENT_ORDERS),
                Self::fetch_top_products(state, env, DEFAULT_TOP_PRODUCTS),
            ])],

            DashboardAction::FetchStats => smallvec![Self::fetch_stats(state, env)],

            DashboardAction::FetchRecentOrders { limit } => {
                smallvec![Self::fetch_recent_orders(state, env, limit)]
            },

            DashboardAction::FetchTopProducts { limit } => {
                smallvec![Self::fetch_top_products(state, env, limit)]
            },

            DashboardAction::StatsLoaded { token, result } => {
                state.stats.complete(token, result);
                SmallVec::new()
            },

            DashboardAction::RecentOrdersLoaded { token, result } => {
                state.recent_orders.complete(token, result);
                SmallVec::new()
            },

            DashboardAction::TopProductsLoaded { token, result } => {
                state.top_products.complete(token, result);
                SmallVec::new()
            },
        }
    }
}
