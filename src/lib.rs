//! bqcache - credential-scoped caching layer for Google BigQuery data access
//!
//! Sits in front of the project → dataset → table hierarchy and memoizes
//! listing, query, and schema calls. Results are keyed on the operation,
//! its arguments, and a one-way fingerprint of the caller's credentials,
//! and expire after a fixed TTL.
//!
//! ```ignore
//! use bqcache::{CacheConfig, Credentials, DataAccessHandler};
//!
//! let handler = DataAccessHandler::with_config(provider, &CacheConfig::default())?;
//! let creds = Credentials::from(record);
//!
//! // Second call within the TTL is served from the cache
//! let datasets = handler.list_datasets(&creds, "my-project").await?;
//! let datasets = handler.list_datasets(&creds, "my-project").await?;
//! ```

pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod provider;

pub use cache::{
    CacheStats, CacheStore, ClearStats, DEFAULT_TTL, KeyArg, MemoizingInvoker, MemoryStore,
    SqliteStore, cache_key,
};
pub use config::CacheConfig;
pub use credentials::{CredentialRecord, Credentials, LiveCredential};
pub use error::{
    CacheError, ConfigError, CredentialError, DataAccessError, Error, ProviderError, Result,
};
pub use handler::DataAccessHandler;
pub use provider::{
    BigQueryApi, Dataset, FieldSchema, Project, ProviderResult, Table, TableData, TableRef,
};
