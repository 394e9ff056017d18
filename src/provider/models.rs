//! Resource records returned by the provider capability
//!
//! Serde shapes follow the Google API JSON conventions (camelCase wire
//! names). Identifiers are opaque to this layer: they pass through into
//! cache keys and provider calls unmodified and are never validated here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cloud project visible to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID
    #[serde(rename = "projectId")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Numeric project number (optional, not in all responses)
    #[serde(skip_serializing_if = "Option::is_none", rename = "projectNumber")]
    pub project_number: Option<String>,
}

/// Dataset within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset ID
    #[serde(rename = "datasetId")]
    pub id: String,

    /// Display name (optional)
    #[serde(skip_serializing_if = "Option::is_none", rename = "friendlyName")]
    pub friendly_name: Option<String>,

    /// Geographic location of the dataset (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Table within a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table ID
    #[serde(rename = "tableId")]
    pub id: String,

    /// Table type (TABLE, VIEW, EXTERNAL, ...)
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub table_type: Option<String>,

    /// Display name (optional)
    #[serde(skip_serializing_if = "Option::is_none", rename = "friendlyName")]
    pub friendly_name: Option<String>,
}

/// Fully-qualified table reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    #[serde(rename = "projectId")]
    pub project_id: String,

    #[serde(rename = "datasetId")]
    pub dataset_id: String,

    #[serde(rename = "tableId")]
    pub table_id: String,
}

impl TableRef {
    pub fn new(project_id: &str, dataset_id: &str, table_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            dataset_id: dataset_id.to_string(),
            table_id: table_id.to_string(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }
}

/// One column of a table schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Column name
    pub name: String,

    /// Column type (STRING, INTEGER, TIMESTAMP, ...)
    #[serde(rename = "type")]
    pub field_type: String,

    /// Column mode (NULLABLE, REQUIRED, REPEATED)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Column description (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Materialized query result: ordered rows with typed columns.
///
/// Cell values are JSON values in schema column order; interpretation
/// beyond that is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Column schema, in result order
    pub schema: Vec<FieldSchema>,

    /// Row values, one `Vec` per row in schema column order
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl TableData {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
