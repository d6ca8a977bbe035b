use super::*;
use pretty_assertions::assert_eq;

#[test]
fn mounting_a_list_view_fetches_profile_then_list_without_user() {
    let mut state = state();
    let effects = run_user(&mut state, UserAction::Navigate(Route::Requests));

    assert_eq!(state.route, Route::Requests);
    assert_eq!(
        fetches_for(&effects),
        vec![Resource::Profile, Resource::Requests]
    );
}

#[test]
fn cached_user_skips_profile_fetch_on_every_mount() {
    let mut state = state();
    run_runtime(&mut state, RuntimeAction::SetUser(profile("me")));

    for (route, expected) in [
        (Route::Feed, vec![Resource::Feed]),
        (Route::Connections, vec![Resource::Connections]),
        (Route::Requests, vec![Resource::Requests]),
        (Route::Profile, Vec::new()),
    ] {
        let effects = run_user(&mut state, UserAction::Navigate(route));
        assert_eq!(fetches_for(&effects), expected, "mounting {route:?}");
    }
}

#[test]
fn remounting_refetches_lists_unconditionally() {
    let mut state = state();
    run_runtime(&mut state, RuntimeAction::SetUser(profile("me")));
    run_runtime(&mut state, RuntimeAction::SetFeed(vec![profile("U1")]));

    let effects = run_user(&mut state, UserAction::Navigate(Route::Feed));
    assert_eq!(fetches_for(&effects), vec![Resource::Feed]);
}

#[test]
fn login_route_mounts_without_reads() {
    let mut state = state();
    let effects = run_user(&mut state, UserAction::Navigate(Route::Login));
    assert_eq!(effects, vec![AppEffect::RequestFrame]);

    assert!(run_user(&mut state, UserAction::NextRoute).is_empty());
    assert_eq!(state.route, Route::Login);
}

#[test]
fn route_cycling_mounts_the_next_view() {
    let mut state = state();
    run_runtime(&mut state, RuntimeAction::SetUser(profile("me")));
    run_user(&mut state, UserAction::Navigate(Route::Feed));

    let effects = run_user(&mut state, UserAction::NextRoute);
    assert_eq!(state.route, Route::Requests);
    assert_eq!(fetches_for(&effects), vec![Resource::Requests]);

    run_user(&mut state, UserAction::PrevRoute);
    assert_eq!(state.route, Route::Feed);
}

#[test]
fn toggling_auth_mode_clears_login_error() {
    let mut state = state();
    run_runtime(
        &mut state,
        RuntimeAction::SetError {
            route: Route::Login,
            message: "Invalid credentials".to_string(),
        },
    );
    run_user(&mut state, UserAction::ToggleAuthMode);

    assert_eq!(state.auth_mode, crate::state::AuthMode::Signup);
    assert_eq!(state.views.login.error, None);
}
