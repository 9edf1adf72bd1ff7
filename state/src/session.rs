//! Session container.
//!
//! Holds the token and profile the rest of the client reads, and keeps the
//! [`TokenSlot`] shared with the HTTP client in step with them.

use crate::notice::Notices;
use depot_access::{Role, Session, UserProfile};
use depot_api::TokenSlot;
use depot_core::environment::Clock;
use depot_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<SessionAction>; 4]>;

/// The current session and its notices.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Token and profile; anonymous until sign-in
    pub session: Session,
    /// Messages for the shell
    pub notices: Notices,
    /// Bumped on every session change; orders the token slot writes
    generation: u64,
}

impl SessionState {
    /// Role of the signed-in user, if recognized.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }
}

/// Session container actions.
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Adopt a token and profile obtained elsewhere
    SignIn {
        /// Bearer token
        token: String,
        /// Profile of the user the token belongs to
        user: UserProfile,
    },
    /// Forget the session
    SignOut,
    /// The backend rejected the token
    Expired,
    /// Drop shown notices
    ClearNotices,
}

/// Dependencies of [`SessionReducer`].
#[derive(Clone)]
pub struct SessionEnvironment {
    /// Token slot read by the HTTP client
    pub tokens: TokenSlot,
    /// Clock used to stamp notices
    pub clock: Arc<dyn Clock>,
}

impl SessionEnvironment {
    /// Bind the session to the client's token slot.
    #[must_use]
    pub fn new(tokens: TokenSlot, clock: Arc<dyn Clock>) -> Self {
        Self { tokens, clock }
    }
}

/// Reducer for [`SessionState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionReducer;

impl SessionReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Write the token slot as of a fresh session generation.
    fn write_token(
        state: &mut SessionState,
        env: &SessionEnvironment,
        token: Option<String>,
    ) -> Effects {
        state.generation += 1;
        let generation = state.generation;
        let tokens = env.tokens.clone();
        smallvec![Effect::future(async move {
            tokens.apply(generation, token);
            None
        })]
    }
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            SessionAction::SignIn { token, user } => {
                tracing::info!(user = %user.username, role = ?user.role, "signed in");
                state.session = Session::signed_in(token.clone(), user);
                Self::write_token(state, env, Some(token))
            },

            SessionAction::SignOut => {
                if !state.session.is_authenticated() {
                    return SmallVec::new();
                }
                tracing::info!("signed out");
                state.session = Session::anonymous();
                state.notices.info("Logged out successfully", &*env.clock);
                Self::write_token(state, env, None)
            },

            SessionAction::Expired => {
                if !state.session.is_authenticated() {
                    return SmallVec::new();
                }
                tracing::warn!("session rejected by backend");
                state.session = Session::anonymous();
                state
                    .notices
                    .warning("Your session has expired, please sign in again", &*env.clock);
                Self::write_token(state, env, None)
            },

            SessionAction::ClearNotices => {
                state.notices.drain();
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use depot_access::landing_route;
    use depot_testing::{ReducerTest, assertions, collect_actions, test_clock};

    fn env() -> SessionEnvironment {
        SessionEnvironment::new(TokenSlot::new(), Arc::new(test_clock()))
    }

    #[test]
    fn sign_out_when_anonymous_is_a_no_op() {
        ReducerTest::new(SessionReducer::new())
            .with_env(env())
            .given_state(SessionState::default())
            .when_action(SessionAction::SignOut)
            .then_state(|state| assert!(state.notices.is_empty()))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn sign_in_and_out_drive_the_token_slot() {
        let env = env();
        let reducer = SessionReducer::new();
        let mut state = SessionState::default();

        let effects = reducer.reduce(
            &mut state,
            SessionAction::SignIn {
                token: "tok-1".to_string(),
                user: UserProfile::new(4, "hoa", Role::Driver),
            },
            &env,
        );
        assert!(collect_actions(effects).await.is_empty());
        assert_eq!(env.tokens.get().as_deref(), Some("tok-1"));
        assert_eq!(state.role(), Some(Role::Driver));
        assert_eq!(landing_route(&state.session), "/driver/dashboard");

        let effects = reducer.reduce(&mut state, SessionAction::SignOut, &env);
        collect_actions(effects).await;
        assert!(!env.tokens.is_present());
        assert!(!state.session.is_authenticated());
        assert_eq!(landing_route(&state.session), "/login");

        let notice = state.notices.last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "Logged out successfully");
    }

    #[tokio::test]
    async fn expiry_warns_and_clears() {
        let env = env();
        let reducer = SessionReducer::new();
        let mut state = SessionState {
            session: Session::signed_in("tok", UserProfile::new(1, "an", Role::Admin)),
            ..SessionState::default()
        };
        env.tokens.set("tok");

        let effects = reducer.reduce(&mut state, SessionAction::Expired, &env);
        collect_actions(effects).await;

        assert!(!env.tokens.is_present());
        assert_eq!(state.notices.last().unwrap().level, NoticeLevel::Warning);

        let effects = reducer.reduce(&mut state, SessionAction::ClearNotices, &env);
        assertions::assert_no_effects(&effects);
        assert!(state.notices.is_empty());
    }
}
