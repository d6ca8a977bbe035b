use async_trait::async_trait;
use serde_json::Value;

use crate::client::Transport;
use crate::contracts::parse_body;
use crate::contracts::ApiRequest;
use crate::contracts::Method;
use crate::error::ApiError;
use crate::error::ErrorBody;

/// `reqwest` transport. The cookie store keeps the session cookie the
/// backend sets on login, so every later call is credentialed.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url(&request.path);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self
                .client
                .post(&url)
                .json(&request.body.unwrap_or_else(|| serde_json::json!({}))),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        classify_response(status, &text)
    }
}

/// Splits a settled response into a body or a typed failure.
pub fn classify_response(status: u16, text: &str) -> Result<Value, ApiError> {
    let value = parse_body(text);
    match status {
        200..=299 => Ok(value),
        401 => Err(ApiError::Unauthorized {
            body: ErrorBody::from_value(value),
        }),
        _ => Err(ApiError::Status {
            status,
            body: ErrorBody::from_value(value),
        }),
    }
}
