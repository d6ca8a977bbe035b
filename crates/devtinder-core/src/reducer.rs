#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEffect {
    RequestFrame,
    /// A view mounted and needs this resource read.
    Fetch(Resource),
}

use super::actions::AppAction;
use super::actions::RuntimeAction;
use super::actions::UserAction;
use super::state::max_page_start;
use super::state::AppState;
use super::state::Resource;
use super::state::Route;
use super::state::Toast;

pub fn reduce(state: &mut AppState, action: AppAction) -> Vec<AppEffect> {
    match action {
        AppAction::User(user) => reduce_user(state, user),
        AppAction::Runtime(runtime) => reduce_runtime(state, runtime),
    }
}

fn reduce_user(state: &mut AppState, action: UserAction) -> Vec<AppEffect> {
    match action {
        UserAction::Navigate(route) => mount(state, route),
        UserAction::NextRoute => {
            if !state.route.requires_session() {
                return Vec::new();
            }
            let next = state.route.next();
            mount(state, next)
        }
        UserAction::PrevRoute => {
            if !state.route.requires_session() {
                return Vec::new();
            }
            let prev = state.route.prev();
            mount(state, prev)
        }
        UserAction::ToggleAuthMode => {
            state.auth_mode = state.auth_mode.toggle();
            state.views.login.error = None;
            vec![AppEffect::RequestFrame]
        }
        UserAction::PageNext => {
            let page = state.page_size();
            let Some((start, len)) = paged_list(state) else {
                return Vec::new();
            };
            if *start + page >= len {
                return Vec::new();
            }
            *start = (*start + page).min(max_page_start(len, page));
            vec![AppEffect::RequestFrame]
        }
        UserAction::PagePrev => {
            let page = state.page_size();
            let Some((start, _)) = paged_list(state) else {
                return Vec::new();
            };
            if *start == 0 {
                return Vec::new();
            }
            *start = start.saturating_sub(page);
            vec![AppEffect::RequestFrame]
        }
        UserAction::DismissToast => {
            if state.toast.take().is_some() {
                vec![AppEffect::RequestFrame]
            } else {
                Vec::new()
            }
        }
        UserAction::Tick { now_ms } => {
            let expired = state
                .toast
                .as_ref()
                .is_some_and(|toast| toast.expires_at_ms <= now_ms);
            if !expired {
                return Vec::new();
            }
            state.toast = None;
            vec![AppEffect::RequestFrame]
        }
        UserAction::ClearError => {
            state.views.get_mut(state.route).error = None;
            vec![AppEffect::RequestFrame]
        }
    }
}

fn reduce_runtime(state: &mut AppState, action: RuntimeAction) -> Vec<AppEffect> {
    match action {
        RuntimeAction::SetUser(user) => {
            state.slices.user = state.slices.user.set(user);
        }
        RuntimeAction::ClearUser => {
            state.slices.user = state.slices.user.clear();
        }
        RuntimeAction::SetFeed(list) => {
            state.slices.feed = state.slices.feed.set(list);
        }
        RuntimeAction::RemoveFeedEntry(id) => {
            state.slices.feed = state.slices.feed.remove_by_id(&id);
        }
        RuntimeAction::ClearFeed => {
            state.slices.feed = state.slices.feed.clear();
        }
        RuntimeAction::SetRequests(list) => {
            state.slices.request = state.slices.request.set(list);
            clamp_paging(state);
        }
        RuntimeAction::RemoveRequest(id) => {
            state.slices.request = state.slices.request.remove_by_id(&id);
            clamp_paging(state);
        }
        RuntimeAction::ClearRequests => {
            state.slices.request = state.slices.request.clear_all();
            state.paging.requests = 0;
        }
        RuntimeAction::SetConnections(list) => {
            state.slices.connection = state.slices.connection.set(list);
            clamp_paging(state);
        }
        RuntimeAction::RemoveConnection(id) => {
            state.slices.connection = state.slices.connection.remove_by_id(&id);
            clamp_paging(state);
        }
        RuntimeAction::ClearConnections => {
            state.slices.connection = state.slices.connection.clear();
            state.paging.connections = 0;
        }
        RuntimeAction::SetLoading { route, loading } => {
            state.views.get_mut(route).loading = loading;
        }
        RuntimeAction::SetError { route, message } => {
            state.views.get_mut(route).error = Some(message.into());
        }
        RuntimeAction::ClearError(route) => {
            state.views.get_mut(route).error = None;
        }
        RuntimeAction::ShowToast {
            message,
            expires_at_ms,
        } => {
            // Expiry is checked on `Tick`.
            state.toast = Some(Toast {
                message: message.into(),
                expires_at_ms,
            });
        }
        RuntimeAction::AppendLog(entry) => {
            state.activity.append(entry);
        }
    }
    vec![AppEffect::RequestFrame]
}

fn mount(state: &mut AppState, route: Route) -> Vec<AppEffect> {
    state.route = route;
    match route {
        Route::Requests => state.paging.requests = 0,
        Route::Connections => state.paging.connections = 0,
        Route::Login | Route::Feed | Route::Profile => {}
    }
    let mut effects: Vec<AppEffect> = state
        .mount_resources(route)
        .into_iter()
        .map(AppEffect::Fetch)
        .collect();
    effects.push(AppEffect::RequestFrame);
    effects
}

fn paged_list(state: &mut AppState) -> Option<(&mut usize, usize)> {
    match state.route {
        Route::Requests => Some((&mut state.paging.requests, state.slices.request.len())),
        Route::Connections => Some((
            &mut state.paging.connections,
            state.slices.connection.len(),
        )),
        Route::Login | Route::Feed | Route::Profile => None,
    }
}

fn clamp_paging(state: &mut AppState) {
    let page = state.page_size();
    state.paging.requests = state
        .paging
        .requests
        .min(max_page_start(state.slices.request.len(), page));
    state.paging.connections = state
        .paging
        .connections
        .min(max_page_start(state.slices.connection.len(), page));
}

/// Resources requested by `effects`, in issue order.
pub fn fetches_for(effects: &[AppEffect]) -> Vec<Resource> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            AppEffect::Fetch(resource) => Some(*resource),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests;
