//! Import command implementation
//!
//! This module implements the `import` command, which restores a DynamoDB
//! table from an export file in S3 (or on disk).

use crate::cli::{failure_exit_code, resolve_config, OutputFormat};
use crate::config::HarborConfig;
use crate::core::import::{ImportCoordinator, ImportResponse, ResponseBody};
use crate::domain::HarborError;
use crate::{log_error_with_context, log_import_outcome};
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the import command
#[derive(Args, Debug, Default)]
pub struct ImportArgs {
    /// S3 bucket holding the export file
    #[arg(long)]
    pub source_bucket: Option<String>,

    /// S3 object key of the export file
    #[arg(long)]
    pub source_key: Option<String>,

    /// Read the export file from disk instead of S3
    #[arg(long, value_name = "PATH", conflicts_with = "source_key")]
    pub source_file: Option<PathBuf>,

    /// Destination table name (defaults to the name in the export)
    #[arg(long)]
    pub table_name: Option<String>,

    /// Create the table when it does not exist
    #[arg(long)]
    pub create_table: bool,

    /// Delete and recreate the table when it exists
    #[arg(long)]
    pub overwrite_existing: bool,

    /// Records per group (1-25)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Dry run mode - validate and plan without changing DynamoDB
    #[arg(long)]
    pub dry_run: bool,

    /// AWS region
    #[arg(long)]
    pub region: Option<String>,

    /// Endpoint override for LocalStack or DynamoDB Local
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        tracing::info!("Starting import command");

        let mut config = match resolve_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                return self.reject_configuration(&e);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            let e = HarborError::Configuration(format!("Configuration validation failed: {e}"));
            log_error_with_context!(&e, "Invalid configuration after command-line overrides");
            return self.reject_configuration(&e);
        }

        if config.import.dry_run && self.output == OutputFormat::Text {
            println!("🔍 DRY RUN MODE - No table or record changes will be made");
            println!();
        }

        let max_failures = config.import.max_reported_failures;
        let response = match ImportCoordinator::new(config, self.source_file.as_deref()).await {
            Ok(coordinator) => {
                if self.output == OutputFormat::Text {
                    println!("🚀 Starting import...");
                    println!();
                }
                coordinator.run().await
            }
            Err(e) => {
                log_error_with_context!(&e, "Failed to initialize import");
                ImportResponse::failed(&e)
            }
        };

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
            OutputFormat::Text => print_summary(&response, max_failures),
        }

        Ok(exit_code(&response))
    }

    /// Reports a configuration error and returns exit code 2
    ///
    /// With `--output json` the error is also printed as a 500 response so
    /// callers reading stdout always get a `{statusCode, body}` object.
    fn reject_configuration(&self, error: &HarborError) -> anyhow::Result<i32> {
        eprintln!("❌ {error}");
        if let Some(response) = self.configuration_response(error) {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Ok(failure_exit_code(error))
    }

    fn configuration_response(&self, error: &HarborError) -> Option<ImportResponse> {
        (self.output == OutputFormat::Json).then(|| ImportResponse::failed(error))
    }

    /// Applies command-line overrides on top of file and environment settings
    pub fn apply_overrides(&self, config: &mut HarborConfig) {
        if let Some(bucket) = &self.source_bucket {
            config.source.bucket = bucket.clone();
        }
        if let Some(key) = &self.source_key {
            config.source.key = Some(key.clone());
        }
        if let Some(table_name) = &self.table_name {
            tracing::info!(table = %table_name, "Overriding table name from CLI");
            config.target.table_name = Some(table_name.clone());
        }
        if self.create_table {
            config.target.create_table = true;
        }
        if self.overwrite_existing {
            config.target.overwrite_existing = true;
        }
        if let Some(batch_size) = self.batch_size {
            config.import.batch_size = batch_size;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.import.dry_run = true;
        }
        if let Some(region) = &self.region {
            config.aws.region = region.clone();
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            config.aws.endpoint_url = Some(endpoint_url.clone());
        }
    }
}

/// Maps a response to the process exit code
///
/// 0 when every record was written, 1 when the run completed with record
/// failures, 5 when the run aborted.
pub fn exit_code(response: &ImportResponse) -> i32 {
    match response.completed_body() {
        Some(body) if body.failed_items == 0 => 0,
        Some(_) => 1,
        None => 5,
    }
}

fn print_summary(response: &ImportResponse, max_failures: usize) {
    let body = match &response.body {
        ResponseBody::Completed(body) => body,
        ResponseBody::Failed { error } => {
            println!("❌ Import failed");
            println!("   Error: {error}");
            return;
        }
    };

    log_import_outcome!(body.table_name, body.imported_items, body.failed_items);

    println!("📊 Import Summary:");
    println!("  Table: {}", body.table_name);
    println!("  Source: {}", body.source_file);
    println!("  Import Date: {}", body.import_date);
    if body.dry_run {
        println!("  Records (would import): {}", body.imported_items);
    } else {
        println!("  Imported: {}", body.imported_items);
    }
    println!("  Failed: {}", body.failed_items);
    println!();

    if !body.failures.is_empty() {
        println!("⚠️  Failed Records:");
        for failure in &body.failures {
            println!("    - #{} [{}] {}", failure.index, failure.kind, failure.reason);
        }
        if body.failures_truncated {
            println!(
                "    ... showing the first {max_failures} of {} failures",
                body.failed_items
            );
        }
        println!();
    }

    if body.failed_items == 0 {
        println!("✅ Import completed successfully");
    } else {
        println!("⚠️  Import completed with record failures");
    }
}
