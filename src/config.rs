use crate::VaultError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client configuration: secret path prefix plus the Vault connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "SecretsPath", default)]
    pub secrets_path: String,
    #[serde(rename = "VaultConnection", default)]
    pub connection: ConnectionConfig,
}

/// Connection settings consumed by the HTTP transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(rename = "EndPoint", default)]
    pub endpoint: String,
    #[serde(rename = "CACertFile", default, skip_serializing_if = "Option::is_none")]
    pub ca_cert_file: Option<PathBuf>,
    /// Request timeout in seconds, fractions allowed.
    #[serde(rename = "TimeoutSecs", default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<f64>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VaultError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| VaultError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Full secret path for a caller-supplied relative path.
    pub fn secret_path(&self, path: &str) -> String {
        format!("{}{}", self.secrets_path, path)
    }
}

impl ConnectionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ca_cert_file: None,
            timeout_secs: None,
        }
    }

    /// Configured request timeout; zero, negative or non-finite values are rejected.
    pub fn timeout(&self) -> Result<Option<Duration>, VaultError> {
        let Some(secs) = self.timeout_secs else {
            return Ok(None);
        };
        match Duration::try_from_secs_f64(secs) {
            Ok(timeout) if !timeout.is_zero() => Ok(Some(timeout)),
            _ => Err(VaultError::RequestBuild(format!(
                "Invalid Vault request timeout: {} seconds",
                secs
            ))),
        }
    }

    /// Endpoint without trailing slash, checked to be an absolute http(s) URL.
    pub fn base_url(&self) -> Result<String, VaultError> {
        if self.endpoint.is_empty() {
            return Err(VaultError::RequestBuild(
                "Vault endpoint is not configured".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            VaultError::RequestBuild(format!("Invalid Vault endpoint {}: {}", self.endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(VaultError::RequestBuild(format!(
                "Unsupported scheme in Vault endpoint {}",
                self.endpoint
            )));
        }

        Ok(self.endpoint.trim_end_matches('/').to_string())
    }
}
