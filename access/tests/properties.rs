//! Property tests for the gate, menus and route table.

use depot_access::{
    GateDecision, Navigation, Role, Session, UserProfile, authorize, menu_for_name, resolve,
};
use proptest::prelude::*;

fn role_strategy() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn allow_list_strategy() -> impl Strategy<Value = Vec<Role>> {
    prop::sample::subsequence(Role::ALL.to_vec(), 0..=Role::ALL.len())
}

fn session_strategy() -> impl Strategy<Value = Session> {
    prop_oneof![
        Just(Session::anonymous()),
        role_strategy().prop_map(|role| Session::signed_in("t", UserProfile::new(1, "u", role))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn gate_renders_iff_token_and_role_allowed(
        token in any::<bool>(),
        role in prop::option::of(role_strategy()),
        allowed in allow_list_strategy(),
    ) {
        let expected = token && (allowed.is_empty() || role.is_some_and(|r| allowed.contains(&r)));
        prop_assert_eq!(authorize(token, role, &allowed).renders(), expected);
    }

    #[test]
    fn missing_token_always_redirects_to_login(
        role in prop::option::of(role_strategy()),
        allowed in allow_list_strategy(),
    ) {
        prop_assert_eq!(
            authorize(false, role, &allowed),
            GateDecision::RedirectToLogin { path: "/login" }
        );
    }

    #[test]
    fn unknown_role_names_get_no_menu(name in "[A-Z_]{1,20}") {
        prop_assume!(name.parse::<Role>().is_err());
        prop_assert!(menu_for_name(Some(&name)).is_empty());
    }

    #[test]
    fn resolve_never_redirects_to_itself(
        path in "/[a-z/-]{0,24}",
        session in session_strategy(),
    ) {
        if let Navigation::Redirect(target) = resolve(&path, &session) {
            prop_assert_ne!(resolve(target, &session), Navigation::Redirect(target));
        }
    }
}
