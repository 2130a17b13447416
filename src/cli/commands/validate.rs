//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Harbor configuration file.

use crate::cli::{config_label, resolve_config};
use crate::config::HarborConfig;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let label = config_label(config_path);
        tracing::info!(config = %label, "Validating configuration");

        println!("🔍 Validating configuration: {label}");
        println!();

        // Loading applies environment overrides and validates
        let config = match resolve_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config);
        Ok(0)
    }
}

fn print_summary(config: &HarborConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  AWS Region: {}", config.aws.region);
    if let Some(endpoint) = &config.aws.endpoint_url {
        println!("  Endpoint Override: {endpoint}");
    }
    println!(
        "  Static Credentials: {}",
        if config.aws.access_key_id.is_some() {
            "configured"
        } else {
            "default provider chain"
        }
    );
    println!("  Source Bucket: {}", config.source.bucket);
    println!(
        "  Source Key: {}",
        config.source.key.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Target Table: {}",
        config
            .target
            .table_name
            .as_deref()
            .unwrap_or("(from export)")
    );
    println!("  Create Table: {}", config.target.create_table);
    println!("  Overwrite Existing: {}", config.target.overwrite_existing);
    println!("  Batch Size: {}", config.import.batch_size);
    println!("  Batch Delay: {}ms", config.import.batch_delay_ms);
    println!("  Write Concurrency: {}", config.import.write_concurrency);
    println!("  Dry Run: {}", config.import.dry_run);
    println!(
        "  Table Wait: {} attempts every {}ms",
        config.table_wait.max_poll_attempts, config.table_wait.poll_interval_ms
    );
    println!();
}
