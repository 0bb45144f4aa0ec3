use crate::config::ConnectionConfig;
use crate::models::null_as_default;
use crate::transport::{Method, Request};
use crate::VaultError;
use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/v1/auth/app-id/login";

#[derive(Serialize)]
struct LoginBody<'a> {
    app_id: &'a str,
    user_id: &'a str,
}

/// Body of a successful App ID login
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub lease_id: String,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default, deserialize_with = "saturating_seconds")]
    pub lease_duration: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auth: AuthData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthData {
    #[serde(default)]
    pub client_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub policies: Vec<String>,
    #[serde(default, deserialize_with = "saturating_seconds")]
    pub lease_duration: i64,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub metadata: AuthMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthMetadata {
    #[serde(rename = "app-id", default)]
    pub app_id: String,
    #[serde(rename = "user-id", default)]
    pub user_id: String,
}

/// Lease seconds clamped into `i64`; Vault may send any JSON integer.
fn saturating_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = i128::deserialize(deserializer)?;
    Ok(secs.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
}

/// Prepare the App ID login request. No I/O happens here.
pub fn build_login_request(
    connection: &ConnectionConfig,
    app_id: &str,
    user_id: &str,
) -> Result<Request, VaultError> {
    connection.base_url()?;

    let body = serde_json::to_value(LoginBody { app_id, user_id })?;
    Ok(Request::new(Method::Post, LOGIN_PATH).with_body(body))
}
