//! Inspect command implementation
//!
//! Loads and validates an export file and prints what an import would
//! create, without calling DynamoDB. Local files are read without any AWS
//! configuration at all.

use crate::adapters::database::{create_snapshot_source, load_sdk_config};
use crate::adapters::storage::{LocalFileSource, SnapshotSource};
use crate::cli::{failure_exit_code, resolve_config, OutputFormat};
use crate::core::schema::translate_schema;
use crate::core::snapshot::{SnapshotLoader, SnapshotLocation};
use crate::domain::{BillingMode, ExportArtifact, IndexScope};
use crate::log_error_with_context;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// S3 bucket holding the export file
    #[arg(long)]
    pub source_bucket: Option<String>,

    /// S3 object key of the export file
    #[arg(long)]
    pub source_key: Option<String>,

    /// Read the export file from disk instead of S3
    #[arg(long, value_name = "PATH", conflicts_with = "source_key")]
    pub source_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Summary of a validated export file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub source_file: String,
    pub table_name: String,
    pub partition_key: Option<String>,
    pub sort_key: Option<String>,
    pub billing_mode: BillingMode,
    pub global_indexes: Vec<String>,
    pub local_indexes: Vec<String>,
    pub stream_enabled: bool,
    pub record_count: usize,
    pub export_date: Option<String>,
}

impl ExportSummary {
    /// Summarizes a loaded artifact
    pub fn from_artifact(source_file: String, artifact: &ExportArtifact) -> Self {
        let schema = &artifact.schema;
        let definition = translate_schema(schema, &schema.table_name);
        let index_names = |scope: IndexScope| -> Vec<String> {
            schema
                .indexes()
                .filter(|(s, _)| *s == scope)
                .map(|(_, index)| index.index_name.to_string())
                .collect()
        };

        Self {
            source_file,
            table_name: schema.table_name.to_string(),
            partition_key: schema.partition_key().map(str::to_string),
            sort_key: schema.sort_key().map(str::to_string),
            billing_mode: definition.billing_mode,
            global_indexes: index_names(IndexScope::Global),
            local_indexes: index_names(IndexScope::Local),
            stream_enabled: definition
                .stream_specification
                .map(|stream| stream.stream_enabled)
                .unwrap_or(false),
            record_count: artifact.record_count(),
            export_date: artifact.metadata_str("exportDate").map(str::to_string),
        }
    }
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let mut config = match resolve_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        if let Some(bucket) = &self.source_bucket {
            config.source.bucket = bucket.clone();
        }
        if let Some(key) = &self.source_key {
            config.source.key = Some(key.clone());
        }

        let local_file = self.source_file.as_deref();
        let location = match SnapshotLocation::resolve(&config.source, local_file) {
            Ok(location) => location,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(failure_exit_code(&e));
            }
        };

        tracing::info!(source = %location, "Inspecting export file");

        let source: Arc<dyn SnapshotSource + Send + Sync> = match &location {
            SnapshotLocation::LocalFile(path) => Arc::new(LocalFileSource::new(path.clone())),
            SnapshotLocation::S3 { .. } => {
                let sdk_config = load_sdk_config(&config.aws).await;
                create_snapshot_source(&sdk_config, &config.aws, &location)
            }
        };
        let loader = SnapshotLoader::new(source);

        let artifact = match loader.load().await {
            Ok(artifact) => artifact,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load export file");
                eprintln!("❌ {e}");
                return Ok(failure_exit_code(&e));
            }
        };

        let summary = ExportSummary::from_artifact(loader.location(), &artifact);
        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Text => print_summary(&summary),
        }

        Ok(0)
    }
}

fn print_summary(summary: &ExportSummary) {
    println!("✅ Export file is valid");
    println!();
    println!("📦 Export Summary:");
    println!("  Source: {}", summary.source_file);
    println!("  Table: {}", summary.table_name);
    println!(
        "  Partition Key: {}",
        summary.partition_key.as_deref().unwrap_or("-")
    );
    println!("  Sort Key: {}", summary.sort_key.as_deref().unwrap_or("-"));
    println!("  Billing Mode: {:?}", summary.billing_mode);
    println!("  Global Indexes: {}", list(&summary.global_indexes));
    println!("  Local Indexes: {}", list(&summary.local_indexes));
    println!("  Stream Enabled: {}", summary.stream_enabled);
    println!("  Records: {}", summary.record_count);
    if let Some(date) = &summary.export_date {
        println!("  Exported: {date}");
    }
    println!();
}

fn list(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
