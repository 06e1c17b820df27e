use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::{debug, instrument};

use crate::connection::Client;
use crate::error::StoreError;
use crate::models::readings::{Reading, ReadingKind, attr};

/// The single table every reading is written to.
///
/// Reads are full-table scans with a `type` filter. There is no index and no
/// cursor exposed to callers, so anything beyond `limit` is unreachable.
/// This does not scale past small tables.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts `reading`, overwriting any item with the same id.
    async fn put(&self, reading: &Reading) -> Result<(), StoreError>;

    /// Returns at most `limit` readings of the given kind, in store order.
    async fn scan_by_type(
        &self,
        kind: ReadingKind,
        limit: usize,
    ) -> Result<Vec<Reading>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct DynamoRecordStore {
    client: Client,
    table_name: String,
}

impl DynamoRecordStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Builds the store and verifies the table is reachable.
    pub async fn connect(
        client: Client,
        table_name: impl Into<String>,
    ) -> Result<Self, anyhow::Error> {
        let store = Self::new(client, table_name);
        store.health_check().await.map_err(|e| {
            anyhow::anyhow!(
                "DynamoDB table '{}' is not reachable: {e}",
                store.table_name
            )
        })?;

        Ok(store)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    #[instrument(skip_all, fields(id = %reading.id(), kind = %reading.kind()))]
    async fn put(&self, reading: &Reading) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(reading.to_item()))
            .send()
            .await
            .map_err(|e| StoreError::backend("PutItem", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn scan_by_type(
        &self,
        kind: ReadingKind,
        limit: usize,
    ) -> Result<Vec<Reading>, StoreError> {
        let mut readings = Vec::new();
        if limit == 0 {
            return Ok(readings);
        }

        // DynamoDB applies `Limit` before the filter, so keep following
        // pages until enough items match or the table is exhausted.
        let page_limit = i32::try_from(limit).unwrap_or(i32::MAX);
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut pages = 0usize;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("#type = :type")
                .expression_attribute_names("#type", attr::TYPE)
                .expression_attribute_values(
                    ":type",
                    AttributeValue::S(kind.as_str().to_string()),
                )
                .limit(page_limit)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| StoreError::backend("Scan", e))?;
            pages += 1;

            for item in output.items() {
                if readings.len() == limit {
                    break;
                }
                readings.push(Reading::from_item(item)?);
            }

            match output.last_evaluated_key {
                Some(key) if readings.len() < limit => start_key = Some(key),
                _ => break,
            }
        }

        debug!(pages, found = readings.len(), "Scan completed");
        Ok(readings)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|e| StoreError::backend("DescribeTable", e))?;

        Ok(())
    }
}
