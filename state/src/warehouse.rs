//! Warehouse container.

use crate::ContainerEnvironment;
use crate::notice::Notices;
use crate::resource::{RequestToken, ResourceState, Slot};
use depot_api::models::{Warehouse, WarehouseDraft, WarehouseId};
use depot_api::{ApiError, FormErrors, PageResult, WarehouseApi};
use depot_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<WarehouseAction>; 4]>;

/// Warehouse list, the warehouses open for new orders, and form state.
#[derive(Debug, Clone)]
pub struct WarehouseState {
    /// Loaded rows and fetch status
    pub resource: ResourceState<Warehouse>,
    /// Warehouses currently accepting goods, for the order form
    pub available: Slot<Vec<Warehouse>>,
    /// Problems found in the last submitted form
    pub form_errors: Option<FormErrors>,
    /// A create or update is in flight
    pub submitting: bool,
    /// Messages for the shell
    pub notices: Notices,
}

impl Default for WarehouseState {
    fn default() -> Self {
        Self {
            resource: ResourceState::default(),
            available: Slot::new("warehouses.available"),
            form_errors: None,
            submitting: false,
            notices: Notices::default(),
        }
    }
}

/// Warehouse container actions.
#[derive(Debug, Clone)]
pub enum WarehouseAction {
    /// Load one page of warehouses
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
        result: Result<PageResult<Warehouse>, ApiError>,
    },
    /// Load the warehouses accepting goods
    FetchAvailable,
    /// Outcome of [`WarehouseAction::FetchAvailable`]
    AvailableLoaded {
        /// Token the fetch was issued with
        token: RequestToken,
        /// Warehouses or failure
        result: Result<Vec<Warehouse>, ApiError>,
    },
    /// Validate and submit a new warehouse
    Create {
        /// Form contents
        draft: WarehouseDraft,
    },
    /// Outcome of a create
    Created {
        /// Stored warehouse or failure
        result: Result<Warehouse, ApiError>,
    },
    /// Validate and submit changes to a warehouse
    Update {
        /// Warehouse to change
        id: WarehouseId,
        /// Form contents
        draft: WarehouseDraft,
    },
    /// Outcome of an update
    Updated {
        /// Stored warehouse or failure
        result: Result<Warehouse, ApiError>,
    },
    /// Delete a warehouse
    Delete {
        /// Warehouse to delete
        id: WarehouseId,
    },
    /// Outcome of a delete
    Deleted {
        /// Warehouse that was targeted
        id: WarehouseId,
        /// Backend confirmation or failure
        result: Result<String, ApiError>,
    },
    /// Forget the last fetch failure
    ClearError,
    /// Drop shown notices
    ClearNotices,
}

crate::service_reducer!(
    /// Reducer for [`WarehouseState`], generic over the warehouse service.
    WarehouseReducer
);

fn validate(state: &mut WarehouseState, draft: &WarehouseDraft) -> bool {
    match draft.check() {
        Ok(()) => {
            state.form_errors = None;
            true
        },
        Err(errors) => {
            tracing::debug!(%errors, "warehouse form rejected");
            state.form_errors = Some(errors);
            false
        },
    }
}

impl<A: WarehouseApi + 'static> Reducer for WarehouseReducer<A> {
    type State = WarehouseState;
    type Action = WarehouseAction;
    type Environment = ContainerEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            WarehouseAction::FetchPage { page, size } => {
                let token = state.resource.begin_page_fetch(size);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.list(page, size).await;
                    Some(WarehouseAction::Loaded { token, result })
                })]
            },

            WarehouseAction::Loaded { token, result } => {
                state.resource.complete(token, result);
                SmallVec::new()
            },

            WarehouseAction::FetchAvailable => {
                let token = state.available.begin_fetch();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.available().await;
                    Some(WarehouseAction::AvailableLoaded { token, result })
                })]
            },

            WarehouseAction::AvailableLoaded { token, result } => {
                state.available.complete(token, result);
                SmallVec::new()
            },

            WarehouseAction::Create { draft } => {
                if !validate(state, &draft) {
                    return SmallVec::new();
                }
                state.submitting = true;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.create(&draft).await;
                    Some(WarehouseAction::Created { result })
                })]
            },

            WarehouseAction::Created { result } => {
                state.submitting = false;
                match result {
                    Ok(warehouse) => {
                        state.resource.append(warehouse);
                        state.notices.success("Warehouse created successfully", &*env.clock);
                    },
                    Err(error) => state.notices.error(error.user_message(), &*env.clock),
                }
                SmallVec::new()
            },

            WarehouseAction::Update { id, draft } => {
                if !validate(state, &draft) {
                    return SmallVec::new();
                }
                state.submitting = true;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.update(id, &draft).await;
                    Some(WarehouseAction::Updated { result })
                })]
            },

            WarehouseAction::Updated { result } => {
                state.submitting = false;
                match result {
                    Ok(warehouse) => {
                        state.resource.replace(warehouse);
                        state.notices.success("Warehouse updated successfully", &*env.clock);
                    },
                    Err(error) => state.notices.error(error.user_message(), &*env.clock),
                }
                SmallVec::new()
            },

            WarehouseAction::Delete { id } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.delete(id).await;
                    Some(WarehouseAction::Deleted { id, result })
                })]
            },

            WarehouseAction::Deleted { id, result } => {
                match result {
                    Ok(_) => {
                        state.resource.remove(id);
                        state.notices.success("Warehouse deleted successfully", &*env.clock);
                    },
                    Err(error) => {
                        tracing::warn!(%id, %error, "warehouse delete failed");
                        state.notices.error("Failed to delete warehouse", &*env.clock);
                    },
                }
                SmallVec::new()
            },

            WarehouseAction::ClearError => {
                state.resource.clear_error();
                SmallVec::new()
            },

            WarehouseAction::ClearNotices => {
                state.notices.drain();
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::resource::LoadStatus;
    use depot_api::models::WarehouseStatus;
    use depot_testing::fixtures::warehouse_draft;
    use depot_testing::{InMemoryBackend, ReducerTest, assertions, collect_actions, test_clock};

    fn env(backend: &InMemoryBackend) -> ContainerEnvironment<InMemoryBackend> {
        ContainerEnvironment::new(backend.clone(), Arc::new(test_clock()))
    }

    async fn drive(
        state: &mut WarehouseState,
        env: &ContainerEnvironment<InMemoryBackend>,
        action: WarehouseAction,
    ) {
        let reducer = WarehouseReducer::new();
        let effects = reducer.reduce(state, action, env);
        for follow_up in collect_actions(effects).await {
            let more = reducer.reduce(state, follow_up, env);
            assertions::assert_no_effects(&more);
        }
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let backend = InMemoryBackend::new();
        let draft = WarehouseDraft {
            latitude: Some(91.0),
            ..warehouse_draft("North")
        };

        ReducerTest::new(WarehouseReducer::new())
            .with_env(env(&backend))
            .given_state(WarehouseState::default())
            .when_action(WarehouseAction::Create { draft })
            .then_state(|state| {
                let errors = state.form_errors.as_ref().expect("form errors");
                assert_eq!(
                    errors.message_for("latitude"),
                    Some("Latitude must be between -90 and 90")
                );
                assert!(!state.submitting);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn create_update_delete_patch_the_list() {
        let backend = InMemoryBackend::new();
        let env = env(&backend);
        let mut state = WarehouseState::default();

        drive(&mut state, &env, WarehouseAction::Create { draft: warehouse_draft("North") }).await;
        let created = state.resource.items()[0].clone();
        assert_eq!(state.notices.last().unwrap().message, "Warehouse created successfully");

        let draft = WarehouseDraft {
            capacity: 500,
            ..created.draft()
        };
        drive(&mut state, &env, WarehouseAction::Update { id: created.id, draft }).await;
        assert_eq!(state.resource.get(created.id).unwrap().capacity, 500);

        drive(&mut state, &env, WarehouseAction::Delete { id: created.id }).await;
        assert!(state.resource.items().is_empty());
        assert_eq!(state.notices.len(), 3);
        assert!(state.resource.is_unreconciled());
    }

    #[tokio::test]
    async fn available_lists_active_warehouses_only() {
        let backend = InMemoryBackend::new();
        backend.seed_warehouse(warehouse_draft("Open"));
        backend.seed_warehouse(WarehouseDraft {
            status: WarehouseStatus::Maintenance,
            ..warehouse_draft("Closed")
        });
        let env = env(&backend);

        let mut state = WarehouseState::default();
        drive(&mut state, &env, WarehouseAction::FetchAvailable).await;

        let available = state.available.value().expect("available");
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].name, "Open");
        assert_eq!(state.available.status(), LoadStatus::Ready);
    }

    #[tokio::test]
    async fn failed_delete_reports_generic_message() {
        let backend = InMemoryBackend::new();
        let env = env(&backend);
        let mut state = WarehouseState::default();

        drive(&mut state, &env, WarehouseAction::Delete { id: WarehouseId::new(99) }).await;

        assert_eq!(state.notices.last().unwrap().message, "Failed to delete warehouse");
    }
}
