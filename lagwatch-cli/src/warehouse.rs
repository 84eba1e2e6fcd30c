//! Warehouse client module
//!
//! HTTP client for the BigQuery REST API: reads a table's schema and patches
//! it with additional fields.

use anyhow::{Context, Result};
use lagwatch_core::schema::PLACEHOLDER_COLUMN_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use std::time::Duration;

pub const DEFAULT_BIGQUERY_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Fully qualified destination table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    /// Parses `project.dataset.table`
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [project, dataset, table]
                if !project.is_empty() && !dataset.is_empty() && !table.is_empty() =>
            {
                Ok(Self {
                    project: project.to_string(),
                    dataset: dataset.to_string(),
                    table: table.to_string(),
                })
            }
            _ => anyhow::bail!("invalid table '{}': expected project.dataset.table", s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TableResource {
    #[serde(default)]
    schema: TableSchema,
}

/// Table schema as exchanged with the API
///
/// Fields are kept as raw JSON so a patch writes existing fields back
/// exactly as they were read.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<JsonValue>,
}

impl TableSchema {
    /// Top-level field names, in schema order
    pub fn field_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter_map(|f| f.get("name").and_then(JsonValue::as_str))
            .map(str::to_string)
            .collect()
    }

    /// Appends a nullable placeholder-typed field for each name
    pub fn with_placeholder_fields(mut self, names: &[String]) -> Self {
        self.fields.extend(names.iter().map(|name| {
            json!({
                "name": name,
                "type": PLACEHOLDER_COLUMN_TYPE,
                "mode": "NULLABLE",
            })
        }));
        self
    }
}

/// HTTP client for the BigQuery tables API
pub struct WarehouseClient {
    base_url: String,
    access_token: String,
    client: Client,
}

impl WarehouseClient {
    /// Create a new warehouse client
    ///
    /// # Arguments
    /// * `base_url` - API root, normally [`DEFAULT_BIGQUERY_URL`]
    /// * `access_token` - OAuth access token sent as a bearer token
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            client,
        })
    }

    fn table_url(&self, table: &TableRef) -> String {
        format!(
            "{}/projects/{}/datasets/{}/tables/{}",
            self.base_url, table.project, table.dataset, table.table
        )
    }

    /// Get the current schema of a table
    pub async fn get_schema(&self, table: &TableRef) -> Result<TableSchema> {
        let response = self
            .client
            .get(self.table_url(table))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to send get table request")?;

        let resource: TableResource = self.handle_response(response).await?;
        Ok(resource.schema)
    }

    /// Replace the schema of a table
    pub async fn patch_schema(&self, table: &TableRef, schema: &TableSchema) -> Result<()> {
        let response = self
            .client
            .patch(self.table_url(table))
            .bearer_auth(&self.access_token)
            .json(&json!({ "schema": schema }))
            .send()
            .await
            .context("Failed to send patch table request")?;

        let _: JsonValue = self.handle_response(response).await?;
        Ok(())
    }

    /// Handle API response and deserialize JSON
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Request failed with status {}: {}", status, error_text);
        }

        response
            .json()
            .await
            .context("Failed to parse response JSON")
    }
}
