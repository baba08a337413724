use std::path::PathBuf;

use thiserror::Error;

/// Login did not produce a usable bearer token. Fatal to the run.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("/api/v1/auth/login failed (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Login response did not include access_token")]
    MissingToken,
}

/// A snapshot file handed to the extractor could not be used.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid audit json: {}", .0.display())]
    Invalid(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "email/password required. set KIFU_AUDIT_EMAIL and KIFU_AUDIT_PASSWORD,\nor pass --email / --password."
    )]
    MissingCredentials,

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write snapshot to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that stops a binary with a non-zero exit.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to render snapshot: {0}")]
    Render(#[from] serde_json::Error),
}
