use super::{Method, Request, Response, Transport};
use crate::config::ConnectionConfig;
use crate::VaultError;
use async_trait::async_trait;
use tokio::sync::OnceCell;

const TOKEN_HEADER: &str = "X-Vault-Token";

/// reqwest based transport.
///
/// The underlying `reqwest::Client` is built on first use and shared by all
/// later requests.
pub struct HttpTransport {
    base_url: String,
    connection: ConnectionConfig,
    client: OnceCell<reqwest::Client>,
}

impl HttpTransport {
    pub fn new(connection: ConnectionConfig) -> Result<Self, VaultError> {
        let base_url = connection.base_url()?;
        connection.timeout()?;
        Ok(Self {
            base_url,
            connection,
            client: OnceCell::new(),
        })
    }

    async fn client(&self) -> Result<&reqwest::Client, VaultError> {
        self.client
            .get_or_try_init(|| async { self.build_client() })
            .await
    }

    fn build_client(&self) -> Result<reqwest::Client, VaultError> {
        let mut builder = reqwest::Client::builder();

        if let Some(ref path) = self.connection.ca_cert_file {
            let pem = std::fs::read(path).map_err(|e| {
                VaultError::RequestBuild(format!(
                    "Failed to read CA certificate from {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                VaultError::RequestBuild(format!("Invalid CA certificate: {}", e))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        if let Some(timeout) = self.connection.timeout()? {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(base_url = %self.base_url, "Building Vault HTTP client");
        builder
            .build()
            .map_err(|e| VaultError::RequestBuild(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, VaultError> {
        let client = self.client().await?;
        let url = format!("{}{}", self.base_url, request.path);

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = client.request(method, &url);
        if let Some(ref token) = request.token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| VaultError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| VaultError::Request(e.to_string()))?;

        tracing::trace!(status, path = %request.path, "Vault response");
        Ok(Response::new(status, body.to_vec()))
    }
}
