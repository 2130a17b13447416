//! DynamoDB table store
//!
//! Implements [`TableStore`] on top of the AWS SDK client. SDK errors are
//! converted into Harbor errors here and never leave this module.

use super::models;
use crate::adapters::database::traits::TableStore;
use crate::core::schema::TableDefinition;
use crate::core::table::TableState;
use crate::domain::{
    Record, RecordFailureKind, RecordWriteError, Result, TableError, TableName,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::{BuildError, DisplayErrorContext};
use aws_sdk_dynamodb::Client;

/// DynamoDB-backed [`TableStore`]
#[derive(Clone)]
pub struct DynamoDbTableStore {
    client: Client,
}

impl std::fmt::Debug for DynamoDbTableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbTableStore").finish_non_exhaustive()
    }
}

impl DynamoDbTableStore {
    /// Wrap an SDK client built from the shared AWS configuration
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn create_failed(table: &TableName, err: BuildError) -> TableError {
        TableError::CreateFailed {
            table: table.to_string(),
            message: format!("invalid create-table parameters: {err}"),
        }
    }
}

#[async_trait]
impl TableStore for DynamoDbTableStore {
    async fn table_state(&self, table: &TableName) -> Result<TableState> {
        match self
            .client
            .describe_table()
            .table_name(table.as_str())
            .send()
            .await
        {
            Ok(output) => {
                let status = output.table().and_then(|t| t.table_status());
                tracing::debug!(table = %table, status = ?status, "Described table");
                if models::is_active(status) {
                    Ok(TableState::Active)
                } else {
                    Ok(TableState::Transitioning)
                }
            }
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false) =>
            {
                Ok(TableState::Absent)
            }
            Err(err) => Err(TableError::LifecycleQueryFailed {
                table: table.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            }
            .into()),
        }
    }

    async fn delete_table(&self, table: &TableName) -> Result<()> {
        match self
            .client
            .delete_table()
            .table_name(table.as_str())
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!(table = %table, "Delete table request accepted");
                Ok(())
            }
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false) =>
            {
                tracing::info!(table = %table, "Table already gone");
                Ok(())
            }
            Err(err) => Err(TableError::DeleteFailed {
                table: table.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            }
            .into()),
        }
    }

    async fn create_table(&self, definition: &TableDefinition) -> Result<()> {
        let table = &definition.table_name;
        let build = |err| Self::create_failed(table, err);

        let key_schema = models::key_schema(&definition.key_schema).map_err(build)?;
        let attribute_definitions =
            models::attribute_definitions(&definition.attribute_definitions).map_err(build)?;

        let mut request = self
            .client
            .create_table()
            .table_name(table.as_str())
            .set_key_schema(Some(key_schema))
            .set_attribute_definitions(Some(attribute_definitions))
            .billing_mode(models::billing_mode(definition.billing_mode));

        if let Some(capacity) = definition.capacity {
            request = request.provisioned_throughput(models::throughput(capacity).map_err(build)?);
        }

        if !definition.global_secondary_indexes.is_empty() {
            let indexes = definition
                .global_secondary_indexes
                .iter()
                .map(models::global_index)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(build)?;
            request = request.set_global_secondary_indexes(Some(indexes));
        }

        if !definition.local_secondary_indexes.is_empty() {
            let indexes = definition
                .local_secondary_indexes
                .iter()
                .map(models::local_index)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(build)?;
            request = request.set_local_secondary_indexes(Some(indexes));
        }

        if let Some(stream) = definition.stream_specification {
            request =
                request.stream_specification(models::stream_specification(stream).map_err(build)?);
        }

        request.send().await.map_err(|err| TableError::CreateFailed {
            table: table.to_string(),
            message: DisplayErrorContext(&err).to_string(),
        })?;

        tracing::info!(
            table = %table,
            billing_mode = ?definition.billing_mode,
            indexes = definition.index_count(),
            "Create table request accepted"
        );
        Ok(())
    }

    async fn put_record(
        &self,
        table: &TableName,
        record: &Record,
    ) -> std::result::Result<(), RecordWriteError> {
        let item = models::record_to_item(record)
            .map_err(|message| RecordWriteError::new(RecordFailureKind::Validation, message))?;

        self.client
            .put_item()
            .table_name(table.as_str())
            .set_item(Some(item))
            .send()
            .await
            .map(|_| ())
            .map_err(|err| {
                RecordWriteError::new(
                    models::classify_put_error(&err),
                    DisplayErrorContext(&err).to_string(),
                )
            })
    }

    fn store_name(&self) -> &str {
        "dynamodb"
    }
}
