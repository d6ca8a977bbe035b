use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use serde_json::Value;
use tokio::sync::Notify;

pub(super) use super::ActionOutcome;
pub(super) use super::FetchOutcome;
pub(super) use super::Session;
pub(super) use crate::client::ApiClient;
pub(super) use crate::client::Transport;
pub(super) use crate::contracts::ApiRequest;
pub(super) use crate::error::ApiError;
pub(super) use crate::error::ErrorBody;
pub(super) use devtinder_core::actions::RuntimeAction;
pub(super) use devtinder_core::config::Config;
pub(super) use devtinder_core::models::Profile;
pub(super) use devtinder_core::state::AppState;
pub(super) use devtinder_core::state::Resource;
pub(super) use devtinder_core::state::Route;
pub(super) use devtinder_core::store::Store;

mod reconcile;

/// Replays canned replies keyed by `"METHOD /path"` and records every call.
#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Result<Value, ApiError>>>>,
    calls: Mutex<Vec<ApiRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    fn reply(&self, key: &str, result: Result<Value, ApiError>) {
        self.replies
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(result);
    }

    fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn call_keys(&self) -> Vec<String> {
        self.calls().iter().map(ApiRequest::key).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let key = request.key();
        self.calls.lock().unwrap().push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        next.unwrap_or_else(|| {
            Err(ApiError::Status {
                status: 404,
                body: ErrorBody::Text(format!("no scripted reply for {key}")),
            })
        })
    }
}

fn session() -> Session<ScriptedTransport> {
    session_with(ScriptedTransport::default())
}

fn session_with(transport: ScriptedTransport) -> Session<ScriptedTransport> {
    Session::new(Store::new(Config::default()), ApiClient::new(transport))
}

fn transport(session: &Session<ScriptedTransport>) -> &ScriptedTransport {
    session.api().transport()
}

fn state(session: &Session<ScriptedTransport>) -> AppState {
    session.store().snapshot()
}

fn profile(id: &str) -> Profile {
    Profile {
        id: id.to_string(),
        first_name: format!("First-{id}"),
        last_name: format!("Last-{id}"),
        email: None,
        photo_url: None,
        age: None,
        gender: None,
        about: None,
        skills: Vec::new(),
    }
}

fn profile_json(id: &str) -> Value {
    serde_json::to_value(profile(id)).unwrap()
}

fn status_error(status: u16, body: Value) -> ApiError {
    ApiError::Status {
        status,
        body: ErrorBody::from_value(body),
    }
}

fn feed_ids(session: &Session<ScriptedTransport>) -> Option<Vec<String>> {
    state(session)
        .slices
        .feed
        .items()
        .map(|items| items.iter().map(|p| p.id.clone()).collect())
}

fn ok_empty() -> Result<Value, ApiError> {
    Ok(json!({}))
}
