use crate::models::Secret;
use crate::transport::{Method, Request, Response, Transport};
use crate::VaultError;
use std::collections::HashMap;

/// Vault logical API over a [`Transport`], authenticated with one token.
///
/// `Ok(None)` means Vault had nothing at the path.
pub struct Logical<'a> {
    transport: &'a dyn Transport,
    token: String,
}

impl<'a> Logical<'a> {
    pub fn new(transport: &'a dyn Transport, token: impl Into<String>) -> Self {
        Self {
            transport,
            token: token.into(),
        }
    }

    pub async fn read(&self, path: &str) -> Result<Option<Secret>, VaultError> {
        self.call(Request::new(Method::Get, api_path(path))).await
    }

    pub async fn list(&self, path: &str) -> Result<Option<Secret>, VaultError> {
        let path = format!("{}?list=true", api_path(path));
        self.call(Request::new(Method::Get, path)).await
    }

    pub async fn write(
        &self,
        path: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<Option<Secret>, VaultError> {
        let body = serde_json::to_value(data)?;
        self.call(Request::new(Method::Put, api_path(path)).with_body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Secret>, VaultError> {
        self.call(Request::new(Method::Delete, api_path(path))).await
    }

    async fn call(&self, request: Request) -> Result<Option<Secret>, VaultError> {
        let response = self
            .transport
            .send(request.with_token(self.token.clone()))
            .await?;
        parse_secret(response)
    }
}

fn api_path(path: &str) -> String {
    format!("/v1/{}", path.trim_start_matches('/'))
}

fn parse_secret(response: Response) -> Result<Option<Secret>, VaultError> {
    match response.status {
        404 | 204 => Ok(None),
        _ if response.is_success() => {
            if response.body.iter().all(u8::is_ascii_whitespace) {
                return Ok(None);
            }
            Ok(Some(response.json()?))
        }
        status => Err(VaultError::Response {
            status,
            errors: response.errors(),
        }),
    }
}
