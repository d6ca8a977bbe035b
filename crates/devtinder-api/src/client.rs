use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use devtinder_core::models::Connection;
use devtinder_core::models::ConnectionRequest;
use devtinder_core::models::FeedEntry;
use devtinder_core::models::ReviewStatus;
use devtinder_core::models::SendStatus;
use devtinder_core::models::User;
use devtinder_core::validation::Credentials;
use devtinder_core::validation::ProfilePatch;
use devtinder_core::validation::SignupRequest;

use crate::contracts::decode_login;
use crate::contracts::decode_message;
use crate::contracts::decode_user;
use crate::contracts::paths;
use crate::contracts::ApiRequest;
use crate::contracts::ListPayload;
use crate::contracts::ProfileUpdateReply;
use crate::contracts::CONNECTIONS_FIELD;
use crate::contracts::FEED_FIELD;
use crate::contracts::REQUESTS_FIELD;
use crate::error::ApiError;

/// Moves one request to the backend and hands back the decoded JSON body,
/// or a bare string when the body is not JSON. Non-2xx statuses are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

/// Typed view of the backend. Response shapes are normalized here so that
/// nothing past this point inspects raw JSON.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let value = self.post(paths::LOGIN, credentials).await?;
        decode_login(value)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<String, ApiError> {
        let value = self.post(paths::SIGNUP, request).await?;
        Ok(decode_message(value))
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.post(paths::LOGOUT, &serde_json::json!({})).await?;
        Ok(())
    }

    pub async fn view_profile(&self) -> Result<User, ApiError> {
        let value = self.get(paths::PROFILE_VIEW).await?;
        decode_user(value)
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<ProfileUpdateReply, ApiError> {
        let value = self.post(paths::PROFILE_UPDATE, patch).await?;
        ProfileUpdateReply::decode(value)
    }

    pub async fn feed(&self) -> Result<ListPayload<FeedEntry>, ApiError> {
        let value = self.get(paths::FEED).await?;
        ListPayload::decode(value, FEED_FIELD)
    }

    pub async fn connections(&self) -> Result<ListPayload<Connection>, ApiError> {
        let value = self.get(paths::CONNECTIONS).await?;
        ListPayload::decode(value, CONNECTIONS_FIELD)
    }

    pub async fn requests(&self) -> Result<ListPayload<ConnectionRequest>, ApiError> {
        let value = self.get(paths::REQUESTS).await?;
        ListPayload::decode(value, REQUESTS_FIELD)
    }

    pub async fn send_request(&self, status: SendStatus, user_id: &str) -> Result<(), ApiError> {
        let path = paths::send_request(status, user_id);
        self.post(&path, &serde_json::json!({})).await?;
        Ok(())
    }

    pub async fn review_request(
        &self,
        status: ReviewStatus,
        request_id: &str,
    ) -> Result<(), ApiError> {
        let path = paths::review_request(status, request_id);
        self.post(&path, &serde_json::json!({})).await?;
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::get(path);
        debug!(request = %request.key(), "issuing");
        self.transport.send(request).await
    }

    async fn post<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body).map_err(|err| ApiError::Encode(err.to_string()))?;
        let request = ApiRequest::post(path, body);
        debug!(request = %request.key(), "issuing");
        self.transport.send(request).await
    }
}
