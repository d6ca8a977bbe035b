use super::models::Connection;
use super::models::ConnectionRequest;
use super::models::FeedEntry;
use super::models::User;
use super::state::LogEntry;
use super::state::Route;

#[derive(Debug, Clone)]
pub enum AppAction {
    User(UserAction),
    Runtime(RuntimeAction),
}

/// Input coming from whoever drives the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Navigate(Route),
    NextRoute,
    PrevRoute,
    ToggleAuthMode,
    PageNext,
    PagePrev,
    DismissToast,
    Tick { now_ms: i64 },
    ClearError,
}

/// State writes produced by flows once a remote call has settled.
#[derive(Debug, Clone)]
pub enum RuntimeAction {
    SetUser(User),
    ClearUser,

    SetFeed(Vec<FeedEntry>),
    RemoveFeedEntry(String),
    ClearFeed,

    SetRequests(Vec<ConnectionRequest>),
    RemoveRequest(String),
    ClearRequests,

    SetConnections(Vec<Connection>),
    RemoveConnection(String),
    ClearConnections,

    SetLoading {
        route: Route,
        loading: bool,
    },
    SetError {
        route: Route,
        message: String,
    },
    ClearError(Route),

    ShowToast {
        message: String,
        expires_at_ms: i64,
    },
    AppendLog(LogEntry),
}

impl From<UserAction> for AppAction {
    fn from(action: UserAction) -> Self {
        Self::User(action)
    }
}

impl From<RuntimeAction> for AppAction {
    fn from(action: RuntimeAction) -> Self {
        Self::Runtime(action)
    }
}
