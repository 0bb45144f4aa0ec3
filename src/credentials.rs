use crate::VaultError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// App ID login credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "AppID", default)]
    pub app_id: String,
    #[serde(rename = "UserID", default)]
    pub user_id: String,
    #[serde(rename = "UserIDFile", default, skip_serializing_if = "Option::is_none")]
    pub user_id_file: Option<PathBuf>,
}

#[derive(Deserialize)]
struct UserIdFile {
    #[serde(rename = "UserID")]
    user_id: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            user_id: user_id.into(),
            user_id_file: None,
        }
    }

    pub fn with_user_id_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_id_file = Some(path.into());
        self
    }

    /// Load credentials from a JSON document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VaultError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| VaultError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Fill `user_id` from the `UserID` field of `user_id_file`.
    ///
    /// `user_id` is left untouched when the file cannot be read or parsed.
    pub fn resolve_user_id(&mut self) -> Result<(), VaultError> {
        let path = self.user_id_file.as_ref().ok_or_else(|| {
            VaultError::Configuration(
                "Could not read UserID as no UserIDFile is configured".to_string(),
            )
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| VaultError::io(path, e))?;
        let file: UserIdFile = serde_json::from_str(&content)?;

        self.user_id = file.user_id;
        Ok(())
    }

    pub(crate) fn needs_user_id_file(&self) -> bool {
        self.user_id.is_empty() && self.user_id_file.is_some()
    }

    /// Both identifiers must be known before a login attempt.
    pub fn ensure_resolved(&self) -> Result<(), VaultError> {
        if self.app_id.is_empty() {
            return Err(VaultError::Configuration("AppID is not set".to_string()));
        }
        if self.user_id.is_empty() {
            return Err(VaultError::Configuration("UserID is not set".to_string()));
        }
        Ok(())
    }
}
