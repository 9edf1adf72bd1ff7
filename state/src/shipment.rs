//! Shipment container: active shipments and tracking lookups.

use crate::ContainerEnvironment;
use crate::notice::Notices;
use crate::resource::{RequestToken, ResourceState, Slot};
use depot_api::models::{Shipment, ShipmentId, ShipmentStatus};
use depot_api::{ApiError, PageResult, ShipmentApi};
use depot_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<ShipmentAction>; 4]>;

/// Active shipments and the last tracked one.
#[derive(Debug, Clone)]
pub struct ShipmentState {
    /// Shipments still on their way, shown as one page
    pub active: ResourceState<Shipment>,
    /// Result of the last tracking lookup
    pub tracked: Slot<Shipment>,
    /// Messages for the shell
    pub notices: Notices,
}

impl Default for ShipmentState {
    fn default() -> Self {
        Self {
            active: ResourceState::default(),
            tracked: Slot::new("shipments.tracked"),
            notices: Notices::default(),
        }
    }
}

/// Shipment container actions.
#[derive(Debug, Clone)]
pub enum ShipmentAction {
    /// Load the active shipments
    FetchActive,
    /// Outcome of [`ShipmentAction::FetchActive`]
    ActiveLoaded {
        /// Token the fetch was issued with
        token: RequestToken,
        /// Shipments or failure
        result: Result<Vec<Shipment>, ApiError>,
    },
    /// Look a shipment up by tracking number
    Track {
        /// Tracking number as typed
        tracking_number: String,
    },
    /// Outcome of a lookup
    Tracked {
        /// Token the lookup was issued with
        token: RequestToken,
        /// Trimmed tracking number that was looked up
        tracking_number: String,
        /// Shipment or failure
        result: Result<Shipment, ApiError>,
    },
    /// Move a shipment to a new status
    UpdateStatus {
        /// Shipment to move
        id: ShipmentId,
        /// Target status
        status: ShipmentStatus,
    },
    /// Outcome of a status update
    StatusUpdated {
        /// Stored shipment or failure
        result: Result<Shipment, ApiError>,
    },
    /// Drop shown notices
    ClearNotices,
}

crate::service_reducer!(
    /// Reducer for [`ShipmentState`], generic over the shipment service.
    ShipmentReducer
);

impl<A: ShipmentApi + 'static> Reducer for ShipmentReducer<A> {
    type State = ShipmentState;
    type Action = ShipmentAction;
    type Environment = ContainerEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            ShipmentAction::FetchActive => {
                let token = state.active.begin_fetch();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.active().await;
                    Some(ShipmentAction::ActiveLoaded { token, result })
                })]
            },

            ShipmentAction::ActiveLoaded { token, result } => {
                state.active.complete(token, result.map(PageResult::single));
                SmallVec::new()
            },

            ShipmentAction::Track { tracking_number } => {
                let tracking_number = tracking_number.trim().to_string();
                if tracking_number.is_empty() {
                    state.notices.warning("Please enter a tracking number", &*env.clock);
                    return SmallVec::new();
                }
                let token = state.tracked.begin_fetch();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.track(&tracking_number).await;
                    Some(ShipmentAction::Tracked {
                        token,
                        tracking_number,
                        result,
                    })
                })]
            },

            ShipmentAction::Tracked {
                token,
                tracking_number,
                result,
            } => {
                let not_found = matches!(&result, Err(error) if error.is_not_found());
                if !state.tracked.complete(token, result) {
                    return SmallVec::new();
                }
                if not_found {
                    state.notices.warning(
                        format!("No shipment found for tracking number {tracking_number}"),
                        &*env.clock,
                    );
                } else if let Some(error) = state.tracked.error() {
                    let message = error.user_message();
                    state.notices.error(message, &*env.clock);
                }
                SmallVec::new()
            },

            ShipmentAction::UpdateStatus { id, status } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.update_status(id, status).await;
                    Some(ShipmentAction::StatusUpdated { result })
                })]
            },

            ShipmentAction::StatusUpdated { result } => {
                match result {
                    Ok(shipment) => {
                        if let Some(tracked) = state.tracked.value_mut() {
                            if tracked.id == shipment.id {
                                *tracked = shipment.clone();
                            }
                        }
                        state.active.replace(shipment);
                        state.notices.success("Shipment status updated successfully", &*env.clock);
                    },
                    Err(error) => state.notices.error(error.user_message(), &*env.clock),
                }
                SmallVec::new()
            },

            ShipmentAction::ClearNotices => {
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
    use crate::notice::NoticeLevel;
    use crate::resource::LoadStatus;
    use depot_testing::{InMemoryBackend, ReducerTest, assertions, collect_actions, test_clock};

    fn env(backend: &InMemoryBackend) -> ContainerEnvironment<InMemoryBackend> {
        ContainerEnvironment::new(backend.clone(), Arc::new(test_clock()))
    }

    async fn drive(
        state: &mut ShipmentState,
        env: &ContainerEnvironment<InMemoryBackend>,
        action: ShipmentAction,
    ) {
        let reducer = ShipmentReducer::new();
        let effects = reducer.reduce(state, action, env);
        for follow_up in collect_actions(effects).await {
            let more = reducer.reduce(state, follow_up, env);
            assertions::assert_no_effects(&more);
        }
    }

    #[test]
    fn blank_tracking_number_warns() {
        let backend = InMemoryBackend::new();
        ReducerTest::new(ShipmentReducer::new())
            .with_env(env(&backend))
            .given_state(ShipmentState::default())
            .when_action(ShipmentAction::Track {
                tracking_number: "  ".to_string(),
            })
            .then_state(|state| {
                let notice = state.notices.last().expect("notice");
                assert_eq!(notice.level, NoticeLevel::Warning);
                assert_eq!(notice.message, "Please enter a tracking number");
                assert_eq!(state.tracked.status(), LoadStatus::Idle);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn tracks_by_trimmed_number() {
        let backend = InMemoryBackend::new();
        backend.seed_shipment("VN123", ShipmentStatus::InTransit, None);
        let env = env(&backend);

        let mut state = ShipmentState::default();
        drive(&mut state, &env, ShipmentAction::Track { tracking_number: " VN123 ".to_string() }).await;

        assert_eq!(state.tracked.value().unwrap().status, ShipmentStatus::InTransit);
        assert!(state.notices.is_empty());
    }

    #[tokio::test]
    async fn unknown_number_clears_previous_result() {
        let backend = InMemoryBackend::new();
        backend.seed_shipment("VN123", ShipmentStatus::InTransit, None);
        let env = env(&backend);

        let mut state = ShipmentState::default();
        drive(&mut state, &env, ShipmentAction::Track { tracking_number: "VN123".to_string() }).await;
        drive(&mut state, &env, ShipmentAction::Track { tracking_number: "XX000".to_string() }).await;

        assert!(state.tracked.value().is_none());
        assert_eq!(state.tracked.status(), LoadStatus::Error);
        assert_eq!(
            state.notices.last().unwrap().message,
            "No shipment found for tracking number XX000"
        );
    }

    #[tokio::test]
    async fn active_list_and_status_update() {
        let backend = InMemoryBackend::new();
        let moving = backend.seed_shipment("VN1", ShipmentStatus::PickedUp, None);
        backend.seed_shipment("VN2", ShipmentStatus::Delivered, None);
        let env = env(&backend);

        let mut state = ShipmentState::default();
        drive(&mut state, &env, ShipmentAction::FetchActive).await;
        drive(&mut state, &env, ShipmentAction::Track { tracking_number: "VN1".to_string() }).await;
        assert_eq!(state.active.items().len(), 1);
        assert_eq!(state.active.total_pages(), 1);

        drive(
            &mut state,
            &env,
            ShipmentAction::UpdateStatus {
                id: moving.id,
                status: ShipmentStatus::OutForDelivery,
            },
        )
        .await;

        assert_eq!(state.active.items()[0].status, ShipmentStatus::OutForDelivery);
        assert_eq!(state.tracked.value().unwrap().status, ShipmentStatus::OutForDelivery);
    }
}
