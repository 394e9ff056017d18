//! Mock provider capability for testing
//!
//! Provides a mock implementation of [`BigQueryApi`] for unit testing
//! without a real remote service.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::models::{Dataset, FieldSchema, Project, Table, TableData, TableRef};
use super::{BigQueryApi, ProviderResult};
use crate::credentials::LiveCredential;
use crate::error::ProviderError;

/// Mock provider for testing.
///
/// Configure fixture responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockBigQueryClient::new()
///     .with_projects(vec![Project { id: "proj-1".into(), name: "Proj".into(), .. }])
///     .await;
///
/// let projects = mock.list_projects(&live).await?;
/// assert_eq!(projects.len(), 1);
/// ```
pub struct MockBigQueryClient {
    /// Projects to return from list_projects
    projects: Arc<Mutex<Vec<Project>>>,
    /// Datasets to return from list_datasets
    datasets: Arc<Mutex<Vec<Dataset>>>,
    /// Tables to return from list_tables
    tables: Arc<Mutex<Vec<Table>>>,
    /// Result to return from run_query
    table_data: Arc<Mutex<TableData>>,
    /// Schema to return from get_schema
    schema: Arc<Mutex<Vec<FieldSchema>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ProviderError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured run_query invocations for test assertions
    captured_queries: Arc<Mutex<Vec<CapturedQuery>>>,
}

impl Default for MockBigQueryClient {
    fn default() -> Self {
        Self {
            projects: Arc::new(Mutex::new(Vec::new())),
            datasets: Arc::new(Mutex::new(Vec::new())),
            tables: Arc::new(Mutex::new(Vec::new())),
            table_data: Arc::new(Mutex::new(TableData {
                schema: Vec::new(),
                rows: Vec::new(),
            })),
            schema: Arc::new(Mutex::new(Vec::new())),
            error: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
            captured_queries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Tracks capability call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub list_projects: usize,
    pub list_datasets: usize,
    pub list_tables: usize,
    pub run_query: usize,
    pub get_schema: usize,
}

impl CallCounts {
    /// Get total number of capability calls made.
    pub fn total(&self) -> usize {
        self.list_projects + self.list_datasets + self.list_tables + self.run_query
            + self.get_schema
    }
}

/// A captured query invocation for test assertions.
#[derive(Debug, Clone)]
pub struct CapturedQuery {
    /// Billing project the query ran under
    pub project_id: String,
    /// Dataset location supplied by the caller
    pub location: String,
    /// The SQL text exactly as received
    pub sql: String,
}

impl MockBigQueryClient {
    /// Create a new mock with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure projects to return from list_projects.
    pub async fn with_projects(self, projects: Vec<Project>) -> Self {
        *self.projects.lock().await = projects;
        self
    }

    /// Configure datasets to return from list_datasets.
    pub async fn with_datasets(self, datasets: Vec<Dataset>) -> Self {
        *self.datasets.lock().await = datasets;
        self
    }

    /// Configure tables to return from list_tables.
    pub async fn with_tables(self, tables: Vec<Table>) -> Self {
        *self.tables.lock().await = tables;
        self
    }

    /// Configure the result to return from run_query.
    pub async fn with_table_data(self, data: TableData) -> Self {
        *self.table_data.lock().await = data;
        self
    }

    /// Configure the schema to return from get_schema.
    pub async fn with_schema(self, schema: Vec<FieldSchema>) -> Self {
        *self.schema.lock().await = schema;
        self
    }

    /// Configure an error to return on the next capability call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ProviderError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured queries for test assertions.
    pub async fn captured_queries(&self) -> Vec<CapturedQuery> {
        self.captured_queries.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> ProviderResult<()> {
        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl BigQueryApi for MockBigQueryClient {
    async fn list_projects(&self, _credentials: &LiveCredential) -> ProviderResult<Vec<Project>> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.list_projects += 1;

        Ok(self.projects.lock().await.clone())
    }

    async fn list_datasets(
        &self,
        _credentials: &LiveCredential,
        _project_id: &str,
    ) -> ProviderResult<Vec<Dataset>> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.list_datasets += 1;

        Ok(self.datasets.lock().await.clone())
    }

    async fn list_tables(
        &self,
        _credentials: &LiveCredential,
        _project_id: &str,
        _dataset_id: &str,
    ) -> ProviderResult<Vec<Table>> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.list_tables += 1;

        Ok(self.tables.lock().await.clone())
    }

    async fn run_query(
        &self,
        _credentials: &LiveCredential,
        project_id: &str,
        location: &str,
        sql: &str,
    ) -> ProviderResult<TableData> {
        {
            let mut captured = self.captured_queries.lock().await;
            captured.push(CapturedQuery {
                project_id: project_id.to_string(),
                location: location.to_string(),
                sql: sql.to_string(),
            });
        }
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.run_query += 1;

        Ok(self.table_data.lock().await.clone())
    }

    async fn get_schema(
        &self,
        _credentials: &LiveCredential,
        _table: &TableRef,
        _location: &str,
    ) -> ProviderResult<Vec<FieldSchema>> {
        self.check_error().await?;

        let mut counts = self.call_count.lock().await;
        counts.get_schema += 1;

        Ok(self.schema.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialRecord;
    use std::collections::BTreeSet;

    fn live() -> LiveCredential {
        CredentialRecord {
            access_token: "tok".to_string(),
            refresh_token: None,
            token_endpoint: None,
            client_id: None,
            client_secret: None,
            scopes: BTreeSet::new(),
        }
        .into_live()
        .unwrap()
    }

    #[tokio::test]
    async fn test_mock_default_empty() {
        let mock = MockBigQueryClient::new();

        let projects = mock.list_projects(&live()).await.unwrap();
        assert!(projects.is_empty());

        let datasets = mock.list_datasets(&live(), "proj").await.unwrap();
        assert!(datasets.is_empty());
    }

    #[tokio::test]
    async fn test_mock_with_projects() {
        let mock = MockBigQueryClient::new()
            .with_projects(vec![
                Project {
                    id: "proj-1".to_string(),
                    name: "Project One".to_string(),
                    project_number: Some("1".to_string()),
                },
                Project {
                    id: "proj-2".to_string(),
                    name: "Project Two".to_string(),
                    project_number: None,
                },
            ])
            .await;

        let projects = mock.list_projects(&live()).await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, "proj-1");
        assert_eq!(projects[1].name, "Project Two");
    }

    #[tokio::test]
    async fn test_mock_with_error_consumed_once() {
        let mock = MockBigQueryClient::new()
            .with_error(ProviderError::Unauthorized)
            .await;

        let result = mock.list_projects(&live()).await;
        assert!(result.is_err());

        // Error is consumed, next call succeeds
        let result = mock.list_projects(&live()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_mock_call_counts() {
        let mock = MockBigQueryClient::new();

        mock.list_projects(&live()).await.unwrap();
        mock.list_projects(&live()).await.unwrap();
        mock.list_datasets(&live(), "proj").await.unwrap();

        let counts = mock.call_counts().await;
        assert_eq!(counts.list_projects, 2);
        assert_eq!(counts.list_datasets, 1);
        assert_eq!(counts.total(), 3);
    }

    #[tokio::test]
    async fn test_mock_captures_queries() {
        let mock = MockBigQueryClient::new();

        mock.run_query(&live(), "proj", "US", "SELECT 1")
            .await
            .unwrap();

        let captured = mock.captured_queries().await;
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].project_id, "proj");
        assert_eq!(captured[0].location, "US");
        assert_eq!(captured[0].sql, "SELECT 1");
    }
}
