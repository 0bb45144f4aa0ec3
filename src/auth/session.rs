use super::{LoginResponse, TokenStatus};
use crate::transport::{Request, Transport};
use crate::VaultError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

const HTTP_OK: u16 = 200;

struct SessionState {
    last_response: Option<LoginResponse>,
    status: TokenStatus,
}

impl SessionState {
    fn token(&self) -> &str {
        self.last_response
            .as_ref()
            .map(|r| r.auth.client_token.as_str())
            .unwrap_or_default()
    }
}

/// App ID login session.
///
/// Caches the token from the last successful login and logs in again once
/// its lease has run out. The state lock is held across a login, so
/// concurrent callers share a single in-flight login exchange.
pub struct Session {
    transport: Arc<dyn Transport>,
    request: Request,
    state: Mutex<SessionState>,
}

impl Session {
    /// `request` is the prepared login request, see [`super::build_login_request`].
    pub fn new(transport: Arc<dyn Transport>, request: Request) -> Self {
        Self {
            transport,
            request,
            state: Mutex::new(SessionState {
                last_response: None,
                status: TokenStatus::NeverFetched,
            }),
        }
    }

    /// Returns a valid token, logging in first when none is cached or the
    /// cached one has expired.
    pub async fn get_token(&self) -> Result<String, VaultError> {
        let mut state = self.state.lock().await;

        if state.status.needs_login(Instant::now()) {
            self.refresh(&mut state).await?;
        }

        let token = state.token();
        if token.is_empty() {
            return Err(VaultError::EmptyToken);
        }
        Ok(token.to_string())
    }

    pub async fn status(&self) -> TokenStatus {
        self.state.lock().await.status
    }

    /// Response of the last successful login.
    pub async fn last_response(&self) -> Option<LoginResponse> {
        self.state.lock().await.last_response.clone()
    }

    /// Forget the cached token; the next `get_token` logs in again.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.last_response = None;
        state.status = TokenStatus::NeverFetched;
    }

    /// State is only replaced after a complete, usable login response.
    async fn refresh(&self, state: &mut SessionState) -> Result<(), VaultError> {
        tracing::debug!(status = ?state.status, "Logging in to Vault");

        let response = self.transport.send(self.request.clone()).await?;

        if response.status != HTTP_OK {
            let errors = response.errors();
            tracing::warn!(status = response.status, errors = ?errors, "Vault login failed");
            return Err(VaultError::Authentication {
                status: response.status,
                errors,
            });
        }

        let login: LoginResponse = response.json()?;
        if login.auth.client_token.is_empty() {
            return Err(VaultError::EmptyToken);
        }

        state.status = TokenStatus::from_lease(login.auth.lease_duration, Instant::now());
        tracing::info!(
            lease_duration = login.auth.lease_duration,
            policies = ?login.auth.policies,
            "Logged in to Vault"
        );
        state.last_response = Some(login);
        Ok(())
    }
}
