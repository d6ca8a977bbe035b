use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use devtinder_core::models::ReviewStatus;
use devtinder_core::models::SendStatus;
use devtinder_core::models::User;

use crate::error::ApiError;

pub const SIGNUP_SUCCESS: &str = "User added Successfully";
pub const EMAIL_ALREADY_EXISTS: &str = "Email already exists";
pub const PROFILE_UPDATED: &str = "Profile Updated Successfully";

pub const FEED_FIELD: &str = "users";
pub const CONNECTIONS_FIELD: &str = "connections";
pub const REQUESTS_FIELD: &str = "connectionRequest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    /// `"GET /user/feed"`, used for logging and test scripting.
    pub fn key(&self) -> String {
        format!("{} {}", self.method.as_str(), self.path)
    }
}

pub mod paths {
    use super::ReviewStatus;
    use super::SendStatus;

    pub const LOGIN: &str = "/login";
    pub const SIGNUP: &str = "/signup";
    pub const LOGOUT: &str = "/logout";
    pub const PROFILE_VIEW: &str = "/profile/view";
    pub const PROFILE_UPDATE: &str = "/profile/update";
    pub const FEED: &str = "/user/feed";
    pub const CONNECTIONS: &str = "/user/connections";
    pub const REQUESTS: &str = "/user/requests/interested";

    pub fn send_request(status: SendStatus, user_id: &str) -> String {
        format!("/request/send/{}/{user_id}", status.as_str())
    }

    pub fn review_request(status: ReviewStatus, request_id: &str) -> String {
        format!("/request/review/{}/{request_id}", status.as_str())
    }
}

/// A list resource after normalization. The backend answers an empty list
/// with a bare message string instead of an empty array.
#[derive(Debug, Clone, PartialEq)]
pub enum ListPayload<T> {
    Empty(String),
    Populated(Vec<T>),
}

impl<T: DeserializeOwned> ListPayload<T> {
    /// A string body is `Empty`; an object reads `field`, where a missing or
    /// null field counts as an empty list. Any other shape is rejected whole.
    pub fn decode(value: Value, field: &str) -> Result<Self, ApiError> {
        match value {
            Value::String(message) => Ok(Self::Empty(message)),
            Value::Object(mut map) => match map.remove(field) {
                None | Some(Value::Null) => Ok(Self::Populated(Vec::new())),
                Some(list) => serde_json::from_value(list)
                    .map(Self::Populated)
                    .map_err(|err| ApiError::Decode(format!("`{field}`: {err}"))),
            },
            other => Err(ApiError::Decode(format!(
                "expected object or message for `{field}`, got {}",
                value_kind(&other)
            ))),
        }
    }
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Empty(_) => Vec::new(),
            Self::Populated(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty(_) => 0,
            Self::Populated(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdateReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<User>,
}

impl ProfileUpdateReply {
    pub fn decode(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::String(message) => Ok(Self {
                message: Some(message),
                data: None,
            }),
            other => serde_json::from_value(other)
                .map_err(|err| ApiError::Decode(format!("profile update: {err}"))),
        }
    }

    /// The updated user, only when the backend confirmed with the success text.
    pub fn into_updated_user(self) -> Option<User> {
        match self.message.as_deref() {
            Some(PROFILE_UPDATED) => self.data,
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    user: User,
}

pub fn decode_login(value: Value) -> Result<User, ApiError> {
    serde_json::from_value::<LoginReply>(value)
        .map(|reply| reply.user)
        .map_err(|err| ApiError::Decode(format!("login: {err}")))
}

pub fn decode_user(value: Value) -> Result<User, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Decode(format!("profile: {err}")))
}

/// Text replies such as the signup confirmation.
pub fn decode_message(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

/// Turns a raw body into JSON; bodies that do not parse are a bare string.
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
