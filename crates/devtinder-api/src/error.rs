use std::fmt;

use serde_json::Value;

/// Whatever the backend sent alongside a failing status.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Empty,
    Text(String),
    Json(Value),
}

impl ErrorBody {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(text) if text.trim().is_empty() => Self::Empty,
            Value::String(text) => Self::Text(text),
            other => Self::Json(other),
        }
    }

    /// `message`, then `error`, then a bare text body.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(text) => Some(text.clone()),
            Self::Json(value) => ["message", "error"]
                .iter()
                .find_map(|key| {
                    value
                        .get(key)
                        .and_then(Value::as_str)
                        .filter(|message| !message.is_empty())
                })
                .map(str::to_string),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Empty | Self::Json(_) => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("<empty>"),
            Self::Text(text) => f.write_str(text),
            Self::Json(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized { body: ErrorBody },
    #[error("status {status}: {body}")]
    Status { status: u16, body: ErrorBody },
    #[error("transport: {0}")]
    Transport(String),
    #[error("encode request: {0}")]
    Encode(String),
    #[error("decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Unauthorized { body } | Self::Status { body, .. } => Some(body),
            Self::Transport(_) | Self::Encode(_) | Self::Decode(_) => None,
        }
    }

    /// Most specific message the backend supplied, if any.
    pub fn message(&self) -> Option<String> {
        self.body().and_then(ErrorBody::message)
    }

    /// The payload as the backend sent it, falling back to this error's text.
    pub fn raw_message(&self) -> String {
        match self.body() {
            Some(ErrorBody::Text(text)) => text.clone(),
            Some(ErrorBody::Json(value)) => value.to_string(),
            Some(ErrorBody::Empty) | None => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
