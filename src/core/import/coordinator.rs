//! Import coordinator - main orchestrator for the restore process
//!
//! Sequences the snapshot loader, the table lifecycle manager and the batch
//! importer. Everything that can reject the run (a malformed export, a
//! policy violation) is checked before the destination table is touched.

use super::batch::{BatchConfig, BatchImporter, ImportResult};
use super::summary::{ImportReport, ImportResponse};
use crate::adapters::database::traits::TableStore;
use crate::adapters::database::{create_snapshot_source, create_table_store, load_sdk_config};
use crate::adapters::storage::SnapshotSource;
use crate::config::HarborConfig;
use crate::core::schema::translate_schema;
use crate::core::snapshot::{SnapshotLoader, SnapshotLocation};
use crate::core::table::{
    LifecyclePolicy, Sleeper, TableLifecycleManager, TokioSleeper, WaitPolicy,
};
use crate::domain::{ExportArtifact, HarborError, Result, TableName};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Import coordinator
pub struct ImportCoordinator {
    config: HarborConfig,
    loader: SnapshotLoader,
    lifecycle: TableLifecycleManager,
    importer: BatchImporter,
}

impl ImportCoordinator {
    /// Create a coordinator backed by S3 (or `local_file`) and DynamoDB
    ///
    /// # Errors
    ///
    /// Returns [`HarborError::MissingSourceKey`] when neither a local file
    /// nor an S3 object key is configured.
    pub async fn new(config: HarborConfig, local_file: Option<&Path>) -> Result<Self> {
        let location = SnapshotLocation::resolve(&config.source, local_file)?;
        let sdk_config = load_sdk_config(&config.aws).await;

        let store = create_table_store(&sdk_config);
        let source = create_snapshot_source(&sdk_config, &config.aws, &location);

        tracing::debug!(
            source = %location,
            store = store.store_name(),
            "Import components ready"
        );

        Ok(Self::with_components(
            config,
            source,
            store,
            Arc::new(TokioSleeper),
        ))
    }

    /// Create a coordinator from explicit components
    pub fn with_components(
        config: HarborConfig,
        source: Arc<dyn SnapshotSource + Send + Sync>,
        store: Arc<dyn TableStore + Send + Sync>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let lifecycle = TableLifecycleManager::new(
            store.clone(),
            sleeper.clone(),
            WaitPolicy::from(&config.table_wait),
        );
        let batch_config = BatchConfig::from_config(&config.import);
        let importer = BatchImporter::new(store, sleeper, batch_config);

        Self {
            config,
            loader: SnapshotLoader::new(source),
            lifecycle,
            importer,
        }
    }

    /// Runs the import and converts the outcome into a response
    ///
    /// Fatal errors become a single 500 response; record failures never do.
    pub async fn run(&self) -> ImportResponse {
        match self.execute_import().await {
            Ok(report) => {
                report.log_summary();
                ImportResponse::completed(&report, self.config.import.max_reported_failures)
            }
            Err(e) => {
                tracing::error!(error = %e, source = %self.loader.location(), "Import failed");
                ImportResponse::failed(&e)
            }
        }
    }

    /// Execute the import
    ///
    /// 1. Loads and validates the export file
    /// 2. Resolves the destination table name and creation parameters
    /// 3. Applies the table policy (delete and create as required)
    /// 4. Writes the records in paced groups
    pub async fn execute_import(&self) -> Result<ImportReport> {
        let start_time = Instant::now();
        let import_date = Utc::now();
        let dry_run = self.config.import.dry_run;

        tracing::info!(
            source = %self.loader.location(),
            dry_run,
            "Starting import"
        );

        let artifact = self.loader.load().await?;
        let table_name = self.target_table(&artifact)?;
        let definition = translate_schema(&artifact.schema, &table_name);
        let policy = LifecyclePolicy::from(&self.config.target);

        let (table_action, result) = if dry_run {
            let action = self.lifecycle.plan(&table_name, policy).await?;
            tracing::info!(
                table = %table_name,
                table_action = %action,
                records = artifact.record_count(),
                indexes = definition.index_count(),
                "Dry run: no table or record changes made"
            );
            (action, Self::dry_run_result(&artifact))
        } else {
            let action = self.lifecycle.prepare(&definition, policy).await?;
            let result = self.importer.import(&table_name, &artifact.records).await;
            (action, result)
        };

        Ok(ImportReport {
            table_name: table_name.into_inner(),
            source_file: self.loader.location(),
            import_date,
            table_action,
            total_records: artifact.record_count(),
            result,
            dry_run,
            duration: start_time.elapsed(),
        })
    }

    fn target_table(&self, artifact: &ExportArtifact) -> Result<TableName> {
        match &self.config.target.table_name {
            Some(name) => {
                let table = TableName::new(name.as_str()).map_err(HarborError::Validation)?;
                tracing::info!(
                    exported = %artifact.schema.table_name,
                    target = %table,
                    "Overriding destination table name"
                );
                Ok(table)
            }
            None => Ok(artifact.schema.table_name.clone()),
        }
    }

    fn dry_run_result(artifact: &ExportArtifact) -> ImportResult {
        ImportResult {
            success_count: artifact.record_count(),
            ..ImportResult::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{
        MockTableStore, RecordingSleeper, StaticSnapshotSource, StoreCall,
    };
    use crate::core::table::{TableAction, TableState};
    use crate::domain::{RecordFailureKind, TableError};
    use serde_json::{json, Value};
    use std::time::Duration;
    use test_case::test_case;

    const SOURCE: &str = "s3://dynamodb-table-exports/users.json";

    fn export(records: Vec<Value>) -> Value {
        json!({
            "metadata": {"exportDate": "2025-01-01T00:00:00Z", "itemCount": records.len()},
            "schema": {
                "TableName": "Users",
                "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
                "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}],
                "BillingModeSummary": {"BillingMode": "PAY_PER_REQUEST"}
            },
            "records": records
        })
    }

    fn users(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| json!({"id": format!("u{i}"), "name": format!("User {i}")}))
            .collect()
    }

    fn config(create_table: bool, overwrite_existing: bool) -> HarborConfig {
        let mut config = HarborConfig::default();
        config.target.create_table = create_table;
        config.target.overwrite_existing = overwrite_existing;
        config.table_wait.poll_interval_ms = 1000;
        config.table_wait.max_poll_attempts = 5;
        config
    }

    struct Harness {
        coordinator: ImportCoordinator,
        store: Arc<MockTableStore>,
        sleeper: Arc<RecordingSleeper>,
    }

    fn harness(config: HarborConfig, document: Value, store: MockTableStore) -> Harness {
        let store = Arc::new(store.with_transition_polls(1));
        let sleeper = Arc::new(RecordingSleeper::new());
        let coordinator = ImportCoordinator::with_components(
            config,
            Arc::new(StaticSnapshotSource::json(&document, SOURCE)),
            store.clone(),
            sleeper.clone(),
        );
        Harness {
            coordinator,
            store,
            sleeper,
        }
    }

    #[tokio::test]
    async fn test_imports_into_created_table() {
        let h = harness(config(true, false), export(users(3)), MockTableStore::new());

        let response = h.coordinator.run().await;

        assert_eq!(response.status_code, 200);
        let body = response.completed_body().unwrap();
        assert_eq!(body.table_name, "Users");
        assert_eq!(body.imported_items, 3);
        assert_eq!(body.failed_items, 0);
        assert_eq!(body.source_file, SOURCE);
        assert_eq!(h.store.written("Users").len(), 3);
        assert_eq!(h.store.created().len(), 1);
    }

    #[tokio::test]
    async fn test_record_failure_is_reported_not_fatal() {
        let store =
            MockTableStore::new().fail_puts_where("id", json!("u1"), RecordFailureKind::Validation);
        let h = harness(config(true, false), export(users(3)), store);

        let response = h.coordinator.run().await;

        assert_eq!(response.status_code, 200);
        let body = response.completed_body().unwrap();
        assert_eq!((body.imported_items, body.failed_items), (2, 1));
        assert_eq!(body.failures[0].record["id"], json!("u1"));
        assert!(body.failures[0].reason.contains("rejected"));
    }

    #[tokio::test]
    async fn test_existing_table_without_overwrite_is_untouched() {
        let store = MockTableStore::new().with_table("Users", TableState::Active);
        let h = harness(config(true, false), export(users(3)), store);

        let err = h.coordinator.execute_import().await.unwrap_err();

        assert!(matches!(
            err,
            HarborError::Table(TableError::ExistsNoOverwrite(_))
        ));
        assert!(h.store.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_missing_table_without_create_writes_nothing() {
        let h = harness(config(false, false), export(users(3)), MockTableStore::new());

        let response = h.coordinator.run().await;

        assert_eq!(response.status_code, 500);
        assert!(h.store.mutations().is_empty());
        assert_eq!(h.store.put_count(), 0);
    }

    #[test_case("metadata" ; "metadata missing")]
    #[test_case("schema" ; "schema missing")]
    #[test_case("records" ; "records missing")]
    #[tokio::test]
    async fn test_malformed_export_makes_no_table_calls(section: &str) {
        let mut document = export(users(3));
        document.as_object_mut().unwrap().remove(section);
        let h = harness(config(true, true), document, MockTableStore::new());

        let err = h.coordinator.execute_import().await.unwrap_err();

        assert!(matches!(err, HarborError::MalformedExport(_)));
        assert!(err.to_string().contains(&format!("section '{section}'")));
        assert!(h.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_recreates_table() {
        let store = MockTableStore::new().with_table("Users", TableState::Active);
        let h = harness(config(true, true), export(users(2)), store);

        let report = h.coordinator.execute_import().await.unwrap();

        assert_eq!(report.table_action, TableAction::Recreate);
        assert_eq!(
            h.store.mutations()[..2],
            [
                StoreCall::Delete("Users".to_string()),
                StoreCall::Create("Users".to_string())
            ]
        );
        assert_eq!(report.imported_items(), 2);
    }

    #[tokio::test]
    async fn test_groups_are_paced() {
        let h = harness(config(true, false), export(users(53)), MockTableStore::new());

        let report = h.coordinator.execute_import().await.unwrap();

        assert_eq!(report.imported_items() + report.failed_items(), 53);
        let batch_pauses = h
            .sleeper
            .sleeps()
            .into_iter()
            .filter(|d| *d == Duration::from_millis(100))
            .count();
        assert_eq!(batch_pauses, 2);
        let ids: Vec<String> = h
            .store
            .written("Users")
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, (0..53).map(|i| format!("u{i}")).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_target_table_override() {
        let mut config = config(true, false);
        config.target.table_name = Some("UsersRestored".to_string());
        let h = harness(config, export(users(1)), MockTableStore::new());

        let report = h.coordinator.execute_import().await.unwrap();

        assert_eq!(report.table_name, "UsersRestored");
        assert_eq!(h.store.written("UsersRestored").len(), 1);
        assert!(h.store.written("Users").is_empty());
    }

    #[tokio::test]
    async fn test_invalid_target_table_override_is_rejected() {
        let mut config = config(true, true);
        config.target.table_name = Some("no spaces allowed".to_string());
        let store = MockTableStore::new().with_table("Users", TableState::Active);
        let h = harness(config, export(users(1)), store);

        let err = h.coordinator.execute_import().await.unwrap_err();

        assert!(matches!(err, HarborError::Validation(_)));
        assert!(h.store.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_changes() {
        let mut config = config(true, true);
        config.import.dry_run = true;
        let store = MockTableStore::new().with_table("Users", TableState::Active);
        let h = harness(config, export(users(4)), store);

        let response = h.coordinator.run().await;

        let body = response.completed_body().unwrap();
        assert!(body.dry_run);
        assert_eq!(body.imported_items, 4);
        assert!(h.store.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_still_applies_policy() {
        let mut config = config(false, false);
        config.import.dry_run = true;
        let h = harness(config, export(users(1)), MockTableStore::new());

        let err = h.coordinator.execute_import().await.unwrap_err();
        assert!(matches!(
            err,
            HarborError::Table(TableError::MissingNoCreate(_))
        ));
    }
}
