//! Shared handle around [`AppState`].
//!
//! Flows and views receive a `Store` explicitly. The lock is only taken for a
//! single reducer step or snapshot and is never held across an await point.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::actions::AppAction;
use crate::config::Config;
use crate::reducer::reduce;
use crate::reducer::AppEffect;
use crate::state::AppState;
use crate::state::Resource;

#[derive(Debug)]
struct StoreInner {
    state: AppState,
    in_flight: HashSet<Resource>,
}

#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
}

impl Store {
    pub fn new(config: Config) -> Self {
        Self::from_state(AppState::new(config))
    }

    pub fn from_state(state: AppState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                state,
                in_flight: HashSet::new(),
            })),
        }
    }

    pub fn dispatch(&self, action: impl Into<AppAction>) -> Vec<AppEffect> {
        reduce(&mut self.lock().state, action.into())
    }

    pub fn snapshot(&self) -> AppState {
        self.lock().state.clone()
    }

    /// Reads a projection of the current state without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.lock().state)
    }

    /// Marks `resource` as being read. Returns `None` when a read of the same
    /// resource is already outstanding; the guard releases the mark on drop.
    pub fn begin_fetch(&self, resource: Resource) -> Option<FetchGuard> {
        if !self.lock().in_flight.insert(resource) {
            return None;
        }
        Some(FetchGuard {
            store: self.clone(),
            resource,
        })
    }

    pub fn is_fetching(&self, resource: Resource) -> bool {
        self.lock().in_flight.contains(&resource)
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A panic mid-reduce leaves plain data behind; keep serving it.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug)]
pub struct FetchGuard {
    store: Store,
    resource: Resource,
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        self.store.lock().in_flight.remove(&self.resource);
    }
}
