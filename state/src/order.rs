//! Order container.
//!
//! Status changes are checked against the forward-only lifecycle of
//! [`OrderStatus`] before any request is issued; the backend itself only
//! refuses to move delivered or cancelled orders.

use crate::ContainerEnvironment;
use crate::notice::Notices;
use crate::resource::{RequestToken, ResourceState};
use depot_api::models::{Order, OrderDraft, OrderId, OrderStatus};
use depot_api::{ApiError, FormErrors, OrderApi, PageResult};
use depot_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<OrderAction>; 4]>;

/// Order list, form state and notices.
#[derive(Debug, Clone, Default)]
pub struct OrderState {
    /// Loaded rows and fetch status
    pub resource: ResourceState<Order>,
    /// Problems found in the last submitted order
    pub form_errors: Option<FormErrors>,
    /// A create is in flight
    pub submitting: bool,
    /// Messages for the shell
    pub notices: Notices,
}

/// Order container actions.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Load one page of orders, newest first
    FetchPage {
        /// Zero-based page
        page: u32,
        /// Rows per page
        size: u32,
    },
    /// Outcome of a list fetch
    Loaded {
        /// Token the fetch was issued with
        token: RequestToken,
        /// Page or failure
        result: Result<PageResult<Order>, ApiError>,
    },
    /// Validate and place an order
    Create {
        /// Order contents
        draft: OrderDraft,
    },
    /// Outcome of a create
    Created {
        /// Stored order or failure
        result: Result<Order, ApiError>,
    },
    /// Move an order to a new status
    UpdateStatus {
        /// Order to move
        id: OrderId,
        /// Target status
        status: OrderStatus,
    },
    /// Cancel an order
    Cancel {
        /// Order to cancel
        id: OrderId,
    },
    /// Outcome of a status update or cancel
    StatusChanged {
        /// Stored order or failure
        result: Result<Order, ApiError>,
    },
    /// Forget the last fetch failure
    ClearError,
    /// Drop shown notices
    ClearNotices,
}

crate::service_reducer!(
    /// Reducer for [`OrderState`], generic over the order service.
    OrderReducer
);

impl<A: OrderApi + 'static> OrderReducer<A> {
    /// Refuse a transition the lifecycle does not allow.
    ///
    /// Orders that are not loaded are left to the backend to judge.
    fn admits(state: &mut OrderState, env: &ContainerEnvironment<A>, id: OrderId, next: OrderStatus) -> bool {
        let Some(current) = state.resource.get(id).map(|order| order.status) else {
            return true;
        };
        if current.can_transition_to(next) {
            return true;
        }
        tracing::debug!(%id, %current, %next, "order transition refused");
        state.notices.error(
            format!("Cannot change order status from {current} to {next}"),
            &*env.clock,
        );
        false
    }
}

impl<A: OrderApi + 'static> Reducer for OrderReducer<A> {
    type State = OrderState;
    type Action = OrderAction;
    type Environment = ContainerEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            OrderAction::FetchPage { page, size } => {
                let token = state.resource.begin_page_fetch(size);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.list(page, size).await;
                    Some(OrderAction::Loaded { token, result })
                })]
            },

            OrderAction::Loaded { token, result } => {
                state.resource.complete(token, result);
                SmallVec::new()
            },

            OrderAction::Create { draft } => {
                if let Err(errors) = draft.check() {
                    tracing::debug!(%errors, "order form rejected");
                    state.notices.warning(errors.to_string(), &*env.clock);
                    state.form_errors = Some(errors);
                    return SmallVec::new();
                }
                state.form_errors = None;
                state.submitting = true;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.create(&draft).await;
                    Some(OrderAction::Created { result })
                })]
            },

            OrderAction::Created { result } => {
                state.submitting = false;
                match result {
                    Ok(order) => {
                        tracing::info!(order = %order.order_number, "order placed");
                        state.resource.prepend(order);
                        state.notices.success("Order created successfully", &*env.clock);
                    },
                    Err(error) => state.notices.error(error.user_message(), &*env.clock),
                }
                SmallVec::new()
            },

            OrderAction::UpdateStatus { id, status } => {
                if !Self::admits(state, env, id, status) {
                    return SmallVec::new();
                }
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.update_status(id, status).await;
                    Some(OrderAction::StatusChanged { result })
                })]
            },

            OrderAction::Cancel { id } => {
                if !Self::admits(state, env, id, OrderStatus::Cancelled) {
                    return SmallVec::new();
                }
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.cancel(id).await;
                    Some(OrderAction::StatusChanged { result })
                })]
            },

            OrderAction::StatusChanged { result } => {
                match result {
                    Ok(order) => {
                        state.resource.replace(order);
                        state.notices.success("Order status updated successfully", &*env.clock);
                    },
                    Err(error) => state.notices.error(
                        format!("Failed to update order status: {}", error.user_message()),
                        &*env.clock,
                    ),
                }
                SmallVec::new()
            },

            OrderAction::ClearError => {
                state.resource.clear_error();
                SmallVec::new()
            },

            OrderAction::ClearNotices => {
                state.notices.drain();
                SmallVec::new()
            },
        }
    }
}
