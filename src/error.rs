use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Secret store operation a facade error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Read,
    Write,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Could not build Vault request: {0}")]
    RequestBuild(String),

    #[error("Did not get an HTTP 200 code on login, got {status} with message: {errors:?}")]
    Authentication { status: u16, errors: Vec<String> },

    #[error("Vault client token is blank")]
    EmptyToken,

    #[error("Secret not found in Vault: {path}")]
    SecretNotFound { path: String },

    #[error("Vault request error: {0}")]
    Request(String),

    #[error("Vault responded with {status}: {errors:?}")]
    Response { status: u16, errors: Vec<String> },

    #[error("Error getting login token to the Vault for {operation} of {path}: {source}")]
    Token {
        operation: Operation,
        path: String,
        #[source]
        source: Box<VaultError>,
    },

    #[error("Issue when performing {operation} on Vault at {path}: {source}")]
    Transport {
        operation: Operation,
        path: String,
        #[source]
        source: Box<VaultError>,
    },
}

impl VaultError {
    /// Strips `Token` and `Transport` context layers.
    pub fn root_cause(&self) -> &VaultError {
        match self {
            VaultError::Token { source, .. } | VaultError::Transport { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VaultError::Io {
            path: path.into(),
            source,
        }
    }
}
