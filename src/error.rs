//! Error types for the bqcache library

use thiserror::Error;

/// Result type alias for bqcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the library
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    DataAccess(#[from] DataAccessError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Credential validation errors
///
/// Raised by the credential codec before any remote call is attempted.
/// Messages never carry secret material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("access token is missing or empty")]
    MissingAccessToken,

    #[error("refresh token present but token endpoint is missing")]
    MissingTokenEndpoint,

    #[error("token endpoint is not an absolute http(s) URL")]
    MalformedTokenEndpoint,
}

/// Failures reported by the remote provider capability
///
/// Opaque to this layer: the handler wraps any of these into a
/// [`DataAccessError`] carrying the resource identifiers of the call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication rejected by the provider")]
    Unauthorized,

    #[error("Access denied. The credential lacks permission for this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Provider server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// A provider failure wrapped with the operation's resource context
///
/// One variant per handler operation so every error names the identifiers
/// needed to act on it without consulting logs.
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("Failed to list projects: {message}")]
    ListProjects { message: String },

    #[error("Failed to list datasets in project {project_id}: {message}")]
    ListDatasets { project_id: String, message: String },

    #[error("Failed to list tables in {project_id}.{dataset_id}: {message}")]
    ListTables {
        project_id: String,
        dataset_id: String,
        message: String,
    },

    #[error("Error reading table {reference}: {message}")]
    ReadTable { reference: String, message: String },

    #[error("Error getting table schema for {reference}: {message}")]
    GetSchema { reference: String, message: String },
}

/// Cache storage errors
///
/// A store failure fails the operation; the cache is never silently
/// bypassed.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Cache I/O error: {0}")]
    Io(String),

    #[error("Cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cache lock poisoned")]
    Poisoned,

    #[error("Failed to encode cached value: {0}")]
    Encode(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    Save(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}
