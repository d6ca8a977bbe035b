use std::sync::Arc;

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::Notify;

#[tokio::test]
async fn feed_object_payload_is_written_in_order() {
    let session = session();
    transport(&session).reply(
        "GET /user/feed",
        Ok(json!({ "users": [profile_json("a"), profile_json("b")] })),
    );

    let outcome = session.fetch_feed().await;

    assert_eq!(outcome, FetchOutcome::Loaded { count: 2 });
    assert_eq!(feed_ids(&session), Some(vec!["a".to_string(), "b".to_string()]));
    assert!(!state(&session).views.feed.loading);
}

#[tokio::test]
async fn string_payloads_become_empty_lists_for_every_resource() {
    let session = session();
    transport(&session).reply("GET /user/feed", Ok(json!("No users left")));
    transport(&session).reply("GET /user/connections", Ok(json!("Connections list is empty")));
    transport(&session).reply("GET /user/requests/interested", Ok(json!("No requests")));

    assert_eq!(session.fetch_feed().await, FetchOutcome::Loaded { count: 0 });
    assert_eq!(session.fetch_connections().await, FetchOutcome::Loaded { count: 0 });
    assert_eq!(session.fetch_requests().await, FetchOutcome::Loaded { count: 0 });

    let state = state(&session);
    assert_eq!(state.slices.feed.items().map(<[_]>::len), Some(0));
    assert_eq!(state.slices.connection.items().map(<[_]>::len), Some(0));
    assert_eq!(state.slices.request.items().map(<[_]>::len), Some(0));
}

#[tokio::test]
async fn object_payloads_for_connections_and_requests() {
    let session = session();
    transport(&session).reply(
        "GET /user/connections",
        Ok(json!({ "connections": [profile_json("c1")] })),
    );
    transport(&session).reply(
        "GET /user/requests/interested",
        Ok(json!({ "connectionRequest": [
            { "_id": "r1", "fromUserid": profile_json("u1") },
            { "_id": "r2", "fromUserid": profile_json("u2") }
        ] })),
    );

    assert_eq!(session.fetch_connections().await, FetchOutcome::Loaded { count: 1 });
    assert_eq!(session.fetch_requests().await, FetchOutcome::Loaded { count: 2 });

    let state = state(&session);
    let senders: Vec<String> = state
        .slices
        .request
        .items()
        .unwrap()
        .iter()
        .filter_map(|r| r.from_user.as_ref().map(|p| p.id.clone()))
        .collect();
    assert_eq!(senders, vec!["u1".to_string(), "u2".to_string()]);
    assert_eq!(state.slices.connection.len(), 1);
}

#[tokio::test]
async fn failed_list_read_defaults_to_empty_and_reports() {
    let session = session();
    session
        .store()
        .dispatch(RuntimeAction::SetRequests(Vec::new()));
    transport(&session).reply(
        "GET /user/requests/interested",
        Err(ApiError::Transport("connection reset".to_string())),
    );

    let outcome = session.fetch_requests().await;

    assert_eq!(outcome, FetchOutcome::Failed("Could not load requests".to_string()));
    let state = state(&session);
    assert_eq!(state.slices.request.items().map(<[_]>::len), Some(0));
    assert_eq!(state.views.requests.error.as_deref(), Some("Could not load requests"));
    assert!(!state.views.requests.loading);
}

#[tokio::test]
async fn garbage_payload_is_never_partially_written() {
    let session = session();
    session
        .store()
        .dispatch(RuntimeAction::SetFeed(vec![profile("keep")]));
    transport(&session).reply(
        "GET /user/feed",
        Ok(json!({ "users": [profile_json("a"), { "no_id": true }] })),
    );

    let outcome = session.fetch_feed().await;

    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(feed_ids(&session), Some(Vec::new()));
}

#[tokio::test]
async fn connections_are_discarded_before_refetch() {
    let session = session();
    session
        .store()
        .dispatch(RuntimeAction::SetConnections(vec![profile("old")]));
    transport(&session).reply(
        "GET /user/connections",
        Ok(json!({ "connections": [profile_json("new")] })),
    );

    session.fetch_connections().await;

    let ids: Vec<String> = state(&session)
        .slices
        .connection
        .items()
        .unwrap()
        .iter()
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(ids, vec!["new".to_string()]);
}

#[tokio::test]
async fn feed_refetches_even_when_loaded() {
    let session = session();
    transport(&session).reply("GET /user/feed", Ok(json!({ "users": [profile_json("a")] })));
    transport(&session).reply("GET /user/feed", Ok(json!({ "users": [] })));

    session.fetch_feed().await;
    session.fetch_feed().await;

    assert_eq!(transport(&session).calls().len(), 2);
    assert_eq!(feed_ids(&session), Some(Vec::new()));
}

#[tokio::test]
async fn cached_profile_is_never_refetched() {
    let session = session();
    session.store().dispatch(RuntimeAction::SetUser(profile("me")));

    assert_eq!(session.fetch_profile().await, FetchOutcome::Skipped);
    assert_eq!(session.fetch(Resource::Profile).await, FetchOutcome::Skipped);
    assert!(transport(&session).calls().is_empty());
}

#[tokio::test]
async fn profile_read_populates_user_once() {
    let session = session();
    transport(&session).reply("GET /profile/view", Ok(profile_json("me")));

    assert_eq!(session.fetch_profile().await, FetchOutcome::Loaded { count: 1 });
    assert_eq!(session.fetch_profile().await, FetchOutcome::Skipped);

    assert_eq!(transport(&session).call_keys(), vec!["GET /profile/view".to_string()]);
    assert_eq!(
        state(&session).slices.user.get().map(|u| u.id.clone()),
        Some("me".to_string())
    );
}

#[tokio::test]
async fn unauthorized_profile_read_asks_for_login() {
    let session = session();
    transport(&session).reply(
        "GET /profile/view",
        Err(ApiError::Unauthorized {
            body: ErrorBody::Text("Please Login!".to_string()),
        }),
    );

    let outcome = session.fetch_profile().await;

    assert_eq!(outcome, FetchOutcome::AuthRequired);
    assert_eq!(outcome.redirect(), Some(Route::Login));
    assert_eq!(state(&session).slices.user.get(), None);
    assert_eq!(state(&session).views.profile.error, None);
}

#[tokio::test]
async fn other_profile_failures_leave_user_untouched() {
    let session = session();
    transport(&session).reply("GET /profile/view", Err(status_error(500, json!("boom"))));

    let outcome = session.fetch_profile().await;

    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(outcome.redirect(), None);
    let state = state(&session);
    assert_eq!(state.slices.user.get(), None);
    assert!(!state.views.profile.loading);
    assert_eq!(
        state.views.profile.error.as_deref(),
        Some("Could not load your profile")
    );
}

#[tokio::test]
async fn profile_read_marks_its_view_loading_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let session = session_with(ScriptedTransport::gated(gate.clone()));
    transport(&session).reply("GET /profile/view", Ok(profile_json("me")));

    let (outcome, loading_mid_flight) = tokio::join!(session.fetch_profile(), async {
        let loading = session.store().read(|state| state.views.profile.loading);
        gate.notify_one();
        loading
    });

    assert_eq!(outcome, FetchOutcome::Loaded { count: 1 });
    assert!(loading_mid_flight);
    assert!(!state(&session).views.profile.loading);
}
