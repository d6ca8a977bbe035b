use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::Config;
use crate::slices::Slices;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Feed,
    Profile,
    Connections,
    Requests,
}

impl Route {
    pub const HOME: Route = Route::Feed;

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Feed => "Feed",
            Self::Profile => "Profile",
            Self::Connections => "Connections",
            Self::Requests => "Requests",
        }
    }

    /// Routes rendered inside the signed-in shell.
    pub fn requires_session(self) -> bool {
        !matches!(self, Self::Login)
    }

    pub fn next(self) -> Self {
        match self {
            Self::Login => Self::Login,
            Self::Feed => Self::Requests,
            Self::Requests => Self::Connections,
            Self::Connections => Self::Profile,
            Self::Profile => Self::Feed,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Login => Self::Login,
            Self::Feed => Self::Profile,
            Self::Requests => Self::Feed,
            Self::Connections => Self::Requests,
            Self::Profile => Self::Connections,
        }
    }
}

/// A remote read that a view depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Profile,
    Feed,
    Requests,
    Connections,
}

impl Resource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Feed => "feed",
            Self::Requests => "requests",
            Self::Connections => "connections",
        }
    }

    pub fn route(self) -> Route {
        match self {
            Self::Profile => Route::Profile,
            Self::Feed => Route::Feed,
            Self::Requests => Route::Requests,
            Self::Connections => Route::Connections,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Login => Self::Signup,
            Self::Signup => Self::Login,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign Up",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewStatus {
    pub loading: bool,
    pub error: Option<Arc<str>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewStatuses {
    pub login: ViewStatus,
    pub feed: ViewStatus,
    pub profile: ViewStatus,
    pub connections: ViewStatus,
    pub requests: ViewStatus,
}

impl ViewStatuses {
    pub fn get(&self, route: Route) -> &ViewStatus {
        match route {
            Route::Login => &self.login,
            Route::Feed => &self.feed,
            Route::Profile => &self.profile,
            Route::Connections => &self.connections,
            Route::Requests => &self.requests,
        }
    }

    pub fn get_mut(&mut self, route: Route) -> &mut ViewStatus {
        match route {
            Route::Login => &mut self.login,
            Route::Feed => &mut self.feed,
            Route::Profile => &mut self.profile,
            Route::Connections => &mut self.connections,
            Route::Requests => &mut self.requests,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: Arc<str>,
    pub expires_at_ms: i64,
}

/// Index of the first visible row in the paged list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paging {
    pub requests: usize,
    pub connections: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub seq: u64,
    pub level: LogLevel,
    pub ts_ms: Option<i64>,
    pub message: Arc<str>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<Arc<str>>) -> Self {
        Self {
            seq: 0,
            level,
            ts_ms: Some(chrono::Utc::now().timestamp_millis()),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBuffer {
    cap: usize,
    next_seq: u64,
    buf: VecDeque<LogEntry>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(200)
    }
}

impl LogBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            next_seq: 1,
            buf: VecDeque::with_capacity(cap),
        }
    }

    pub fn append(&mut self, mut entry: LogEntry) {
        entry.seq = self.next_seq;
        self.next_seq += 1;

        if self.buf.len() == self.cap {
            self.buf.pop_front();
        }
        self.buf.push_back(entry);
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub config: Config,
    pub slices: Slices,
    pub route: Route,
    pub auth_mode: AuthMode,
    pub views: ViewStatuses,
    pub toast: Option<Toast>,
    pub paging: Paging,
    pub activity: LogBuffer,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            slices: Slices::default(),
            route: Route::HOME,
            auth_mode: AuthMode::Login,
            views: ViewStatuses::default(),
            toast: None,
            paging: Paging::default(),
            activity: LogBuffer::default(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.config.ui.page_size.max(1)
    }

    pub fn current_status(&self) -> &ViewStatus {
        self.views.get(self.route)
    }

    /// Resources a freshly mounted route reads. The shell itself needs the
    /// profile whenever no user is cached.
    pub fn mount_resources(&self, route: Route) -> Vec<Resource> {
        let mut resources = Vec::new();
        if route.requires_session() && !self.slices.user.is_set() {
            resources.push(Resource::Profile);
        }
        match route {
            Route::Feed => resources.push(Resource::Feed),
            Route::Requests => resources.push(Resource::Requests),
            Route::Connections => resources.push(Resource::Connections),
            Route::Login | Route::Profile => {}
        }
        resources
    }
}

/// Largest valid first-row index for a list of `len` rows.
pub fn max_page_start(len: usize, page_size: usize) -> usize {
    len.saturating_sub(page_size)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn route_cycle_skips_login() {
        let mut route = Route::Feed;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(route);
            route = route.next();
        }
        assert_eq!(route, Route::Feed);
        assert!(!seen.contains(&Route::Login));
        assert_eq!(Route::Feed.prev().next(), Route::Feed);
    }

    #[test]
    fn mount_resources_include_profile_until_user_is_cached() {
        let state = AppState::new(Config::default());
        assert_eq!(
            state.mount_resources(Route::Connections),
            vec![Resource::Profile, Resource::Connections]
        );
        assert_eq!(state.mount_resources(Route::Login), Vec::new());
    }

    #[test]
    fn log_buffer_evicts_oldest() {
        let mut logs = LogBuffer::new(2);
        for message in ["one", "two", "three"] {
            logs.append(LogEntry::new(LogLevel::Info, message));
        }
        let seqs: Vec<u64> = logs.iter().map(|entry| entry.seq).collect();
        assert_eq!(seqs, vec![2, 3]);
    }
}
