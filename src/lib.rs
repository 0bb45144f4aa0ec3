//! vault-appid - Vault client using App ID authentication
//!
//! Logs in with an application and user identifier, caches the session
//! token for its lease duration and transparently logs in again before
//! secret operations once the lease is over.
//!
//! ```no_run
//! # async fn run() -> Result<(), vault_appid::VaultError> {
//! let client = vault_appid::VaultClient::builder()
//!     .endpoint("https://vault:8200")
//!     .secrets_path("secret/myapp/")
//!     .app_id("01bd2fe7-e5ab-47c8-ad48-9888ae6348a5")
//!     .user_id_file("/etc/myapp/vault_user_id.json")
//!     .build()
//!     .await?;
//!
//! let db = client.read("database").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
mod config;
mod credentials;
mod error;
mod logical;
mod models;
pub mod transport;

pub use client::{VaultClient, VaultClientBuilder};
pub use config::{Config, ConnectionConfig};
pub use credentials::Credentials;
pub use error::{Operation, VaultError};
pub use logical::Logical;
pub use models::Secret;
