//! Public data-access handler
//!
//! One method per supported operation, each following the same pattern:
//! normalize credentials at the boundary, derive the cache key, then
//! delegate to the memoizing invoker wrapping the provider call.

use std::time::Duration;

use crate::cache::{
    CacheStats, CacheStore, ClearStats, DEFAULT_TTL, KeyArg, MemoizingInvoker, SqliteStore,
    cache_key,
};
use crate::config::CacheConfig;
use crate::credentials::Credentials;
use crate::error::{DataAccessError, Error, Result};
use crate::provider::{BigQueryApi, Dataset, FieldSchema, Project, Table, TableData, TableRef};

/// Credential-scoped, TTL-bounded facade over the provider capability.
///
/// The backing store is injected at construction and owned for the
/// handler's lifetime; `clear_cache` is the only reset operation. The TTL
/// is fixed per instance, so every cached entry shares one staleness
/// window.
pub struct DataAccessHandler<C: BigQueryApi> {
    provider: C,
    cache: MemoizingInvoker,
}

impl<C: BigQueryApi> DataAccessHandler<C> {
    /// Create a handler over an explicit store and TTL
    pub fn new(provider: C, store: Box<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            provider,
            cache: MemoizingInvoker::new(store, ttl),
        }
    }

    /// Create a handler with the SQLite store at its default location and
    /// the default 5-minute TTL
    pub fn with_defaults(provider: C) -> Result<Self> {
        let store = SqliteStore::open()?;
        Ok(Self::new(provider, Box::new(store), DEFAULT_TTL))
    }

    /// Create a handler from a [`CacheConfig`]
    pub fn with_config(provider: C, config: &CacheConfig) -> Result<Self> {
        let store = match &config.cache_dir {
            Some(dir) => SqliteStore::open_at(dir)?,
            None => SqliteStore::open()?,
        };
        Ok(Self::new(provider, Box::new(store), config.ttl()))
    }

    /// The wrapped provider (for capabilities outside the cached surface)
    pub fn provider(&self) -> &C {
        &self.provider
    }

    /// Entry TTL applied to every cached result
    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// List projects accessible to the credential
    pub async fn list_projects(&self, credentials: &Credentials) -> Result<Vec<Project>> {
        let (live, fingerprint) = credentials.resolve()?;
        let key = cache_key("list_projects", &[], &fingerprint);

        self.cache
            .invoke("list_projects", &key, || async {
                self.provider.list_projects(&live).await.map_err(|e| {
                    Error::from(DataAccessError::ListProjects {
                        message: e.to_string(),
                    })
                })
            })
            .await
    }

    /// List datasets in a project
    pub async fn list_datasets(
        &self,
        credentials: &Credentials,
        project_id: &str,
    ) -> Result<Vec<Dataset>> {
        let (live, fingerprint) = credentials.resolve()?;
        let key = cache_key("list_datasets", &[KeyArg::Str(project_id)], &fingerprint);

        self.cache
            .invoke("list_datasets", &key, || async {
                self.provider
                    .list_datasets(&live, project_id)
                    .await
                    .map_err(|e| {
                        Error::from(DataAccessError::ListDatasets {
                            project_id: project_id.to_string(),
                            message: e.to_string(),
                        })
                    })
            })
            .await
    }

    /// List tables in a dataset
    pub async fn list_tables(
        &self,
        credentials: &Credentials,
        project_id: &str,
        dataset_id: &str,
    ) -> Result<Vec<Table>> {
        let (live, fingerprint) = credentials.resolve()?;
        let key = cache_key(
            "list_tables",
            &[KeyArg::Str(project_id), KeyArg::Str(dataset_id)],
            &fingerprint,
        );

        self.cache
            .invoke("list_tables", &key, || async {
                self.provider
                    .list_tables(&live, project_id, dataset_id)
                    .await
                    .map_err(|e| {
                        Error::from(DataAccessError::ListTables {
                            project_id: project_id.to_string(),
                            dataset_id: dataset_id.to_string(),
                            message: e.to_string(),
                        })
                    })
            })
            .await
    }

    /// Read table rows, optionally limited or via a caller-supplied query.
    ///
    /// When `custom_query` is present it is sent verbatim - no templating,
    /// and `limit` is ignored; the caller is responsible for its
    /// correctness and injection safety. Otherwise a `SELECT *` over the
    /// fully-qualified table is built, with `LIMIT` appended only for a
    /// positive `limit`.
    #[allow(clippy::too_many_arguments)]
    pub async fn read_table(
        &self,
        credentials: &Credentials,
        project_id: &str,
        dataset_id: &str,
        table_id: &str,
        location: &str,
        limit: Option<u64>,
        custom_query: Option<&str>,
    ) -> Result<TableData> {
        let (live, fingerprint) = credentials.resolve()?;
        let key = cache_key(
            "read_table",
            &[
                KeyArg::Str(project_id),
                KeyArg::Str(dataset_id),
                KeyArg::Str(table_id),
                KeyArg::Str(location),
                KeyArg::OptInt(limit),
                KeyArg::OptStr(custom_query),
            ],
            &fingerprint,
        );

        let table = TableRef::new(project_id, dataset_id, table_id);
        let sql = build_select(&table, limit, custom_query);

        self.cache
            .invoke("read_table", &key, || async {
                self.provider
                    .run_query(&live, project_id, location, &sql)
                    .await
                    .map_err(|e| {
                        Error::from(DataAccessError::ReadTable {
                            reference: table.to_string(),
                            message: e.to_string(),
                        })
                    })
            })
            .await
    }

    /// Fetch the schema of a table
    pub async fn get_schema(
        &self,
        credentials: &Credentials,
        project_id: &str,
        dataset_id: &str,
        table_id: &str,
        location: &str,
    ) -> Result<Vec<FieldSchema>> {
        let (live, fingerprint) = credentials.resolve()?;
        let key = cache_key(
            "get_schema",
            &[
                KeyArg::Str(project_id),
                KeyArg::Str(dataset_id),
                KeyArg::Str(table_id),
                KeyArg::Str(location),
            ],
            &fingerprint,
        );

        let table = TableRef::new(project_id, dataset_id, table_id);

        self.cache
            .invoke("get_schema", &key, || async {
                self.provider
                    .get_schema(&live, &table, location)
                    .await
                    .map_err(|e| {
                        Error::from(DataAccessError::GetSchema {
                            reference: table.to_string(),
                            message: e.to_string(),
                        })
                    })
            })
            .await
    }

    /// Evict every cached entry, e.g. after credential revocation or a
    /// known upstream data change
    pub fn clear_cache(&self) -> Result<ClearStats> {
        self.cache.clear()
    }

    /// Entry and size statistics from the backing store
    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.stats()
    }
}

/// Build the SQL sent for a `read_table` call.
fn build_select(table: &TableRef, limit: Option<u64>, custom_query: Option<&str>) -> String {
    if let Some(query) = custom_query {
        return query.to_string();
    }
    let mut sql = format!("SELECT * FROM `{}`", table);
    if let Some(n) = limit
        && n > 0
    {
        sql.push_str(&format!(" LIMIT {}", n));
    }
    sql
}
