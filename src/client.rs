use crate::auth::{build_login_request, Session};
use crate::config::{Config, ConnectionConfig};
use crate::credentials::Credentials;
use crate::error::{Operation, VaultError};
use crate::logical::Logical;
use crate::transport::{HttpTransport, Transport};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub struct VaultClientBuilder {
    config: Config,
    credentials: Credentials,
    transport: Option<Arc<dyn Transport>>,
    env_fallback: bool,
}

impl Default for VaultClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultClientBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            credentials: Credentials::default(),
            transport: None,
            env_fallback: true,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.connection.endpoint = url.into();
        self
    }

    pub fn ca_cert_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.connection.ca_cert_file = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.connection.timeout_secs = Some(timeout.as_secs_f64());
        self
    }

    pub fn secrets_path(mut self, prefix: impl Into<String>) -> Self {
        self.config.secrets_path = prefix.into();
        self
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.credentials.app_id = app_id.into();
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.credentials.user_id = user_id.into();
        self
    }

    pub fn user_id_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials.user_id_file = Some(path.into());
        self
    }

    /// Use a custom transport instead of the HTTP one built from the connection config.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Whether empty settings are filled from `VAULT_*` environment variables (default on).
    pub fn env_fallback(mut self, enabled: bool) -> Self {
        self.env_fallback = enabled;
        self
    }

    fn resolve_config(&self) -> (Config, Credentials) {
        if self.env_fallback {
            self.resolve_config_with(|var| std::env::var(var).ok())
        } else {
            self.resolve_config_with(|_| None)
        }
    }

    /// Explicit values win; anything left empty is looked up through `env`.
    fn resolve_config_with(&self, env: impl Fn(&str) -> Option<String>) -> (Config, Credentials) {
        let mut config = self.config.clone();
        let mut credentials = self.credentials.clone();

        let fill = |value: &mut String, var: &str| {
            if value.is_empty() {
                if let Some(env_value) = env(var) {
                    *value = env_value;
                }
            }
        };
        fill(&mut config.connection.endpoint, "VAULT_ADDR");
        fill(&mut config.secrets_path, "VAULT_SECRETS_PATH");
        fill(&mut credentials.app_id, "VAULT_APP_ID");
        fill(&mut credentials.user_id, "VAULT_USER_ID");

        if config.connection.ca_cert_file.is_none() {
            config.connection.ca_cert_file = env("VAULT_CACERT").map(PathBuf::from);
        }
        if credentials.user_id_file.is_none() {
            credentials.user_id_file = env("VAULT_USER_ID_FILE").map(PathBuf::from);
        }

        (config, credentials)
    }

    /// Resolve credentials and log in. Fails if the first login fails.
    pub async fn build(self) -> Result<VaultClient, VaultError> {
        let (config, mut credentials) = self.resolve_config();

        if credentials.needs_user_id_file() {
            credentials.resolve_user_id()?;
        }
        credentials.ensure_resolved()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(config.connection.clone())?),
        };

        let request =
            build_login_request(&config.connection, &credentials.app_id, &credentials.user_id)?;
        let session = Session::new(Arc::clone(&transport), request);
        session.get_token().await?;

        Ok(VaultClient {
            credentials,
            config,
            session,
            transport,
        })
    }
}

/// Secret store client authenticated through App ID login.
///
/// Every operation addresses `secrets_path + path` and obtains its token
/// from the session first.
pub struct VaultClient {
    credentials: Credentials,
    config: Config,
    session: Session,
    transport: Arc<dyn Transport>,
}

impl VaultClient {
    pub fn builder() -> VaultClientBuilder {
        VaultClientBuilder::new()
    }

    /// Client from fully specified settings; the environment is not consulted.
    pub async fn new(config: Config, credentials: Credentials) -> Result<Self, VaultError> {
        VaultClientBuilder::new()
            .config(config)
            .credentials(credentials)
            .env_fallback(false)
            .build()
            .await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.config.connection
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn list(&self, path: &str) -> Result<HashMap<String, serde_json::Value>, VaultError> {
        let full_path = self.config.secret_path(path);
        let logical = self.logical(Operation::List, &full_path).await?;

        match logical.list(&full_path).await {
            Ok(Some(secret)) => Ok(secret.data),
            Ok(None) => Err(VaultError::SecretNotFound { path: full_path }),
            Err(e) => Err(transport_error(Operation::List, full_path, e)),
        }
    }

    pub async fn read(&self, path: &str) -> Result<HashMap<String, serde_json::Value>, VaultError> {
        let full_path = self.config.secret_path(path);
        let logical = self.logical(Operation::Read, &full_path).await?;

        match logical.read(&full_path).await {
            Ok(Some(secret)) => Ok(secret.data),
            Ok(None) => Err(VaultError::SecretNotFound { path: full_path }),
            Err(e) => Err(transport_error(Operation::Read, full_path, e)),
        }
    }

    pub async fn write(
        &self,
        path: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<(), VaultError> {
        let full_path = self.config.secret_path(path);
        let logical = self.logical(Operation::Write, &full_path).await?;

        logical
            .write(&full_path, data)
            .await
            .map(|_| ())
            .map_err(|e| transport_error(Operation::Write, full_path, e))
    }

    /// Deleting a path that holds no secret succeeds.
    pub async fn delete(&self, path: &str) -> Result<(), VaultError> {
        let full_path = self.config.secret_path(path);
        let logical = self.logical(Operation::Delete, &full_path).await?;

        logical
            .delete(&full_path)
            .await
            .map(|_| ())
            .map_err(|e| transport_error(Operation::Delete, full_path, e))
    }

    async fn logical(&self, operation: Operation, path: &str) -> Result<Logical<'_>, VaultError> {
        let token = self
            .session
            .get_token()
            .await
            .map_err(|e| VaultError::Token {
                operation,
                path: path.to_string(),
                source: Box::new(e),
            })?;
        Ok(Logical::new(self.transport.as_ref(), token))
    }
}

fn transport_error(operation: Operation, path: String, source: VaultError) -> VaultError {
    tracing::debug!(%operation, path = %path, error = %source, "Vault operation failed");
    VaultError::Transport {
        operation,
        path,
        source: Box::new(source),
    }
}
