//! Fetch-and-reconcile and action flows.
//!
//! A flow issues its remote call(s), normalizes the reply and only then writes
//! into the store. Navigation is never performed here: flows report where the
//! caller should go through their outcome.

use tracing::debug;
use tracing::info;
use tracing::warn;

use devtinder_core::actions::RuntimeAction;
use devtinder_core::models::ReviewStatus;
use devtinder_core::models::SendStatus;
use devtinder_core::state::LogEntry;
use devtinder_core::state::LogLevel;
use devtinder_core::state::Resource;
use devtinder_core::state::Route;
use devtinder_core::store::Store;
use devtinder_core::validation::Credentials;
use devtinder_core::validation::LoginForm;
use devtinder_core::validation::ProfileForm;
use devtinder_core::validation::SignupForm;

use crate::client::ApiClient;
use crate::client::Transport;
use crate::contracts::EMAIL_ALREADY_EXISTS;
use crate::contracts::SIGNUP_SUCCESS;
use crate::error::ApiError;

pub const SIGNUP_EMAIL_TAKEN: &str = "This email is already registered. Please try logging in.";
pub const SIGNUP_LOGIN_FAILED: &str = "Signup successful but login failed. Please try logging in.";
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
pub const SIGNUP_ERROR: &str = "An error occurred during signup";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile. Please try again.";
pub const PROFILE_SAVED: &str = "Profile saved successfully";
pub const SEND_FAILED: &str = "Failed to send request";
pub const REVIEW_FAILED: &str = "Failed to process request";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { count: usize },
    /// The profile is already cached; nothing was sent.
    Skipped,
    /// Another read of the same resource is still outstanding.
    Coalesced,
    /// The session is gone; the caller should show the login view.
    AuthRequired,
    Failed(String),
}

impl FetchOutcome {
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::AuthRequired => Some(Route::Login),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Navigate(Route),
    /// Rejected by local validation; nothing was sent.
    Invalid(String),
    Failed(String),
}

impl ActionOutcome {
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Navigate(route) => Some(*route),
            _ => None,
        }
    }
}

pub struct Session<T> {
    store: Store,
    api: ApiClient<T>,
}

impl<T: Transport> Session<T> {
    pub fn new(store: Store, api: ApiClient<T>) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub async fn fetch(&self, resource: Resource) -> FetchOutcome {
        match resource {
            Resource::Profile => self.fetch_profile().await,
            Resource::Feed => self.fetch_list(ListResource::Feed).await,
            Resource::Requests => self.fetch_list(ListResource::Requests).await,
            Resource::Connections => self.fetch_list(ListResource::Connections).await,
        }
    }

    /// Reads the signed-in profile unless one is already cached. A cached user
    /// is never refreshed here.
    pub async fn fetch_profile(&self) -> FetchOutcome {
        if self.store.read(|state| state.slices.user.is_set()) {
            return FetchOutcome::Skipped;
        }
        let Some(_guard) = self.store.begin_fetch(Resource::Profile) else {
            debug!("profile read already in flight");
            return FetchOutcome::Coalesced;
        };

        self.store.dispatch(RuntimeAction::SetLoading {
            route: Route::Profile,
            loading: true,
        });
        self.store.dispatch(RuntimeAction::ClearError(Route::Profile));

        let outcome = match self.api.view_profile().await {
            Ok(user) => {
                self.store.dispatch(RuntimeAction::SetUser(user));
                FetchOutcome::Loaded { count: 1 }
            }
            Err(err) if err.is_unauthorized() => {
                info!("profile read unauthorized; login required");
                FetchOutcome::AuthRequired
            }
            Err(err) => {
                warn!(error = %err, "profile read failed");
                let message = "Could not load your profile".to_string();
                self.fail(Route::Profile, &message);
                FetchOutcome::Failed(message)
            }
        };

        self.store.dispatch(RuntimeAction::SetLoading {
            route: Route::Profile,
            loading: false,
        });
        outcome
    }

    pub async fn fetch_feed(&self) -> FetchOutcome {
        self.fetch_list(ListResource::Feed).await
    }

    pub async fn fetch_requests(&self) -> FetchOutcome {
        self.fetch_list(ListResource::Requests).await
    }

    pub async fn fetch_connections(&self) -> FetchOutcome {
        self.fetch_list(ListResource::Connections).await
    }

    async fn fetch_list(&self, list: ListResource) -> FetchOutcome {
        let resource = list.resource();
        let Some(_guard) = self.store.begin_fetch(resource) else {
            debug!(resource = resource.label(), "read already in flight");
            return FetchOutcome::Coalesced;
        };
        let route = resource.route();
        self.store.dispatch(RuntimeAction::SetLoading {
            route,
            loading: true,
        });
        self.store.dispatch(RuntimeAction::ClearError(route));
        if list == ListResource::Connections {
            self.store.dispatch(RuntimeAction::ClearConnections);
        }

        let result = match list {
            ListResource::Feed => self
                .api
                .feed()
                .await
                .map(|payload| RuntimeAction::SetFeed(payload.into_items())),
            ListResource::Requests => self
                .api
                .requests()
                .await
                .map(|payload| RuntimeAction::SetRequests(payload.into_items())),
            ListResource::Connections => self
                .api
                .connections()
                .await
                .map(|payload| RuntimeAction::SetConnections(payload.into_items())),
        };

        let outcome = match result {
            Ok(action) => {
                let count = written_len(&action);
                self.store.dispatch(action);
                debug!(resource = resource.label(), count, "reconciled");
                FetchOutcome::Loaded { count }
            }
            Err(err) => {
                warn!(resource = resource.label(), error = %err, "read failed");
                self.store.dispatch(list.empty());
                let message = format!("Could not load {}", resource.label());
                self.fail(route, &message);
                FetchOutcome::Failed(message)
            }
        };

        self.store.dispatch(RuntimeAction::SetLoading {
            route,
            loading: false,
        });
        outcome
    }

    pub async fn login(&self, form: &LoginForm) -> ActionOutcome {
        let credentials = match form.validate() {
            Ok(credentials) => credentials,
            Err(err) => return self.invalid(Route::Login, err.to_string()),
        };
        match self.login_with(&credentials).await {
            Ok(()) => ActionOutcome::Navigate(Route::HOME),
            Err(err) => {
                warn!(error = %err, "login failed");
                let message = err.raw_message();
                self.fail(Route::Login, &message);
                ActionOutcome::Failed(message)
            }
        }
    }

    /// Signs up, then logs in with the same credentials, then loads the feed.
    /// A failed login leaves no user behind; a failed feed read still lands
    /// on the home view with an empty feed.
    pub async fn signup(&self, form: &SignupForm) -> ActionOutcome {
        let request = match form.validate() {
            Ok(request) => request,
            Err(err) => return self.invalid(Route::Login, err.to_string()),
        };

        let reply = match self.api.signup(&request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "signup failed");
                let message = if err.body().and_then(|body| body.text()) == Some(EMAIL_ALREADY_EXISTS)
                {
                    SIGNUP_EMAIL_TAKEN.to_string()
                } else {
                    match err.body().and_then(|body| body.message()) {
                        Some(message) => message,
                        None => SIGNUP_ERROR.to_string(),
                    }
                };
                self.fail(Route::Login, &message);
                return ActionOutcome::Failed(message);
            }
        };
        if reply != SIGNUP_SUCCESS {
            warn!(reply = %reply, "unexpected signup reply");
            self.fail(Route::Login, SIGNUP_FAILED);
            return ActionOutcome::Failed(SIGNUP_FAILED.to_string());
        }

        if let Err(err) = self.login_with(&request.credentials()).await {
            warn!(error = %err, "login after signup failed");
            self.fail(Route::Login, SIGNUP_LOGIN_FAILED);
            return ActionOutcome::Failed(SIGNUP_LOGIN_FAILED.to_string());
        }

        if let FetchOutcome::Failed(message) = self.fetch_feed().await {
            debug!(%message, "feed after signup defaulted to empty");
        }
        ActionOutcome::Navigate(Route::HOME)
    }

    /// Invalidates the server session first; local state is cleared once the
    /// call settles, whatever its result.
    pub async fn logout(&self) -> ActionOutcome {
        if let Err(err) = self.api.logout().await {
            warn!(error = %err, "logout call failed; clearing local session anyway");
        }
        self.store.dispatch(RuntimeAction::ClearUser);
        self.store.dispatch(RuntimeAction::ClearFeed);
        self.log(LogLevel::Info, "Logged out");
        info!("logged out");
        ActionOutcome::Navigate(Route::Login)
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> ActionOutcome {
        self.store.dispatch(RuntimeAction::ClearError(Route::Profile));
        let patch = match form.validate() {
            Ok(patch) => patch,
            Err(err) => return self.invalid(Route::Profile, err.to_string()),
        };

        self.store.dispatch(RuntimeAction::SetLoading {
            route: Route::Profile,
            loading: true,
        });
        let outcome = match self.api.update_profile(&patch).await {
            Ok(reply) => match reply.into_updated_user() {
                Some(user) => {
                    self.store.dispatch(RuntimeAction::SetUser(user));
                    let toast_ms = self.store.read(|state| state.config.ui.toast_ms);
                    self.store.dispatch(RuntimeAction::ShowToast {
                        message: PROFILE_SAVED.to_string(),
                        expires_at_ms: chrono::Utc::now().timestamp_millis() + toast_ms,
                    });
                    self.log(LogLevel::Info, "Profile updated");
                    ActionOutcome::Completed
                }
                None => {
                    self.fail(Route::Profile, PROFILE_UPDATE_FAILED);
                    ActionOutcome::Failed(PROFILE_UPDATE_FAILED.to_string())
                }
            },
            Err(err) => {
                warn!(error = %err, "profile update failed");
                let message = err
                    .message()
                    .unwrap_or_else(|| PROFILE_UPDATE_FAILED.to_string());
                self.fail(Route::Profile, &message);
                ActionOutcome::Failed(message)
            }
        };
        self.store.dispatch(RuntimeAction::SetLoading {
            route: Route::Profile,
            loading: false,
        });
        outcome
    }

    /// Marks a feed candidate. The entry leaves the feed only once the
    /// backend accepted the call.
    pub async fn send_request(&self, status: SendStatus, user_id: &str) -> ActionOutcome {
        match self.api.send_request(status, user_id).await {
            Ok(()) => {
                self.store
                    .dispatch(RuntimeAction::RemoveFeedEntry(user_id.to_string()));
                self.store.dispatch(RuntimeAction::ClearError(Route::Feed));
                ActionOutcome::Completed
            }
            Err(err) => {
                warn!(status = status.as_str(), user_id, error = %err, "send request failed");
                let message = err.message().unwrap_or_else(|| SEND_FAILED.to_string());
                self.fail(Route::Feed, &message);
                ActionOutcome::Failed(message)
            }
        }
    }

    pub async fn review_request(&self, status: ReviewStatus, request_id: &str) -> ActionOutcome {
        match self.api.review_request(status, request_id).await {
            Ok(()) => {
                self.store
                    .dispatch(RuntimeAction::RemoveRequest(request_id.to_string()));
                self.store.dispatch(RuntimeAction::ClearError(Route::Requests));
                self.log(LogLevel::Info, format!("Request {}", status.as_str()));
                ActionOutcome::Completed
            }
            Err(err) => {
                warn!(status = status.as_str(), request_id, error = %err, "review request failed");
                let message = err.message().unwrap_or_else(|| REVIEW_FAILED.to_string());
                self.fail(Route::Requests, &message);
                ActionOutcome::Failed(message)
            }
        }
    }

    async fn login_with(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let user = self.api.login(credentials).await?;
        info!(user_id = %user.id, "logged in");
        self.log(LogLevel::Info, format!("Logged in as {}", user.full_name()));
        self.store.dispatch(RuntimeAction::SetUser(user));
        self.store.dispatch(RuntimeAction::ClearError(Route::Login));
        Ok(())
    }

    fn invalid(&self, route: Route, message: String) -> ActionOutcome {
        self.store.dispatch(RuntimeAction::SetError {
            route,
            message: message.clone(),
        });
        ActionOutcome::Invalid(message)
    }

    fn fail(&self, route: Route, message: &str) {
        self.store.dispatch(RuntimeAction::SetError {
            route,
            message: message.to_string(),
        });
        self.log(LogLevel::Warn, message.to_string());
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.store
            .dispatch(RuntimeAction::AppendLog(LogEntry::new(level, message.into())));
    }
}

fn written_len(action: &RuntimeAction) -> usize {
    match action {
        RuntimeAction::SetFeed(list) | RuntimeAction::SetConnections(list) => list.len(),
        RuntimeAction::SetRequests(list) => list.len(),
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListResource {
    Feed,
    Requests,
    Connections,
}

impl ListResource {
    fn resource(self) -> Resource {
        match self {
            Self::Feed => Resource::Feed,
            Self::Requests => Resource::Requests,
            Self::Connections => Resource::Connections,
        }
    }

    fn empty(self) -> RuntimeAction {
        match self {
            Self::Feed => RuntimeAction::SetFeed(Vec::new()),
            Self::Requests => RuntimeAction::SetRequests(Vec::new()),
            Self::Connections => RuntimeAction::SetConnections(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests;
