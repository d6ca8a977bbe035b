use pretty_assertions::assert_eq;

pub(super) use super::fetches_for;
pub(super) use super::reduce;
pub(super) use super::AppEffect;
pub(super) use crate::actions::AppAction;
pub(super) use crate::actions::RuntimeAction;
pub(super) use crate::actions::UserAction;
pub(super) use crate::config::Config;
pub(super) use crate::models::ConnectionRequest;
pub(super) use crate::models::Profile;
pub(super) use crate::state::AppState;
pub(super) use crate::state::Resource;
pub(super) use crate::state::Route;

mod navigation;

fn state() -> AppState {
    AppState::new(Config::default())
}

fn profile(id: &str) -> Profile {
    Profile {
        id: id.to_string(),
        first_name: format!("First-{id}"),
        last_name: format!("Last-{id}"),
        email: None,
        photo_url: None,
        age: Some(30),
        gender: Some("other".to_string()),
        about: None,
        skills: Vec::new(),
    }
}

fn request(id: &str, from: &str) -> ConnectionRequest {
    ConnectionRequest {
        id: id.to_string(),
        from_user: Some(profile(from)),
        to_user_id: None,
        status: Some("interested".to_string()),
    }
}

fn run_runtime(state: &mut AppState, action: RuntimeAction) {
    let effects = reduce(state, AppAction::Runtime(action));
    assert!(effects.contains(&AppEffect::RequestFrame));
}

fn run_user(state: &mut AppState, action: UserAction) -> Vec<AppEffect> {
    reduce(state, AppAction::User(action))
}

fn feed_ids(state: &AppState) -> Option<Vec<String>> {
    state
        .slices
        .feed
        .items()
        .map(|items| items.iter().map(|p| p.id.clone()).collect())
}

fn request_ids(state: &AppState) -> Option<Vec<String>> {
    state
        .slices
        .request
        .items()
        .map(|items| items.iter().map(|r| r.id.clone()).collect())
}

#[test]
fn fresh_state_has_every_slice_unloaded() {
    let state = state();
    assert_eq!(state.slices.user.get(), None);
    assert_eq!(state.slices.feed.items(), None);
    assert_eq!(state.slices.request.items(), None);
    assert_eq!(state.slices.connection.items(), None);
    assert_eq!(state.route, Route::HOME);
}
