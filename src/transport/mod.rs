mod http;

pub use http::HttpTransport;

use crate::VaultError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A request addressed relative to the Vault endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Absolute path, may carry a query string (`/v1/secret/app?list=true`).
    pub path: String,
    pub token: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            token: None,
            body: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    errors: Vec<String>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, VaultError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Messages from the `errors` array of a Vault error body.
    ///
    /// Falls back to the raw body text when it is not a Vault error document.
    pub fn errors(&self) -> Vec<String> {
        if let Ok(body) = serde_json::from_slice::<ErrorBody>(&self.body) {
            return body.errors;
        }
        let text = String::from_utf8_lossy(&self.body).trim().to_string();
        if text.is_empty() {
            Vec::new()
        } else {
            vec![text]
        }
    }
}

/// Network side of the client: sends one request, returns one response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, VaultError>;
}
