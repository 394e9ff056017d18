//! Remote provider capability
//!
//! The caching layer never speaks the provider's wire protocol itself; it
//! consumes this trait. Implementations own transport, retries, and
//! timeouts, and report failures as [`ProviderError`], which the handler
//! wraps with resource context.

use async_trait::async_trait;

use crate::credentials::LiveCredential;
use crate::error::ProviderError;

#[cfg(test)]
pub mod mock;
pub mod models;

#[cfg(test)]
pub use mock::MockBigQueryClient;
pub use models::{Dataset, FieldSchema, Project, Table, TableData, TableRef};

/// Result type for capability calls
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// The remote data-platform capability: projects → datasets → tables →
/// rows/schema.
///
/// Every call carries the live credential it executes under; the
/// capability holds no session state of its own.
#[async_trait]
pub trait BigQueryApi: Send + Sync {
    /// List projects accessible to the credential
    async fn list_projects(&self, credentials: &LiveCredential) -> ProviderResult<Vec<Project>>;

    /// List datasets in a project
    async fn list_datasets(
        &self,
        credentials: &LiveCredential,
        project_id: &str,
    ) -> ProviderResult<Vec<Dataset>>;

    /// List tables in a dataset
    async fn list_tables(
        &self,
        credentials: &LiveCredential,
        project_id: &str,
        dataset_id: &str,
    ) -> ProviderResult<Vec<Table>>;

    /// Execute a SQL query and materialize the result
    async fn run_query(
        &self,
        credentials: &LiveCredential,
        project_id: &str,
        location: &str,
        sql: &str,
    ) -> ProviderResult<TableData>;

    /// Fetch the schema of a table
    async fn get_schema(
        &self,
        credentials: &LiveCredential,
        table: &TableRef,
        location: &str,
    ) -> ProviderResult<Vec<FieldSchema>>;
}
