//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Harbor configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Make AWS credentials available (profile, environment or role)");
                println!("  3. Validate configuration: harbor validate-config");
                println!("  4. Check the export file: harbor inspect --source-key <key>");
                println!("  5. Run the restore: harbor import --source-key <key> --create-table");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Harbor Configuration File
# DynamoDB table restore from S3 snapshots

[application]
log_level = "info"

[aws]
region = "us-east-1"

[source]
bucket = "dynamodb-table-exports"
# key = "exports/Users.json"

[target]
create_table = false
overwrite_existing = false

[import]
batch_size = 25
batch_delay_ms = 100

[table_wait]
poll_interval_ms = 5000
max_poll_attempts = 60

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Harbor Configuration File
# DynamoDB table restore from S3 snapshots
#
# Every setting can be overridden with a HARBOR_<SECTION>_<KEY> environment
# variable (for example HARBOR_SOURCE_KEY or HARBOR_IMPORT_BATCH_SIZE), and
# values may reference environment variables with ${VAR_NAME}.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# AWS Settings (shared by the S3 and DynamoDB clients)
# ============================================================================
[aws]
# AWS region
region = "us-east-1"

# Endpoint override for LocalStack or DynamoDB Local.
# S3 requests switch to path-style addressing when this is set.
# endpoint_url = "http://localhost:4566"

# Static credentials, intended for local endpoints only.
# Both must be set together; otherwise the default provider chain is used.
# access_key_id = "test"
# secret_access_key = "${LOCAL_AWS_SECRET}"

# Timeout for each SDK operation in seconds
operation_timeout_seconds = 60

# ============================================================================
# Export File Location
# ============================================================================
[source]
# S3 bucket holding export files
bucket = "dynamodb-table-exports"

# Object key of the export file (required unless --source-file is used)
# key = "exports/Users.json"

# ============================================================================
# Destination Table
# ============================================================================
[target]
# Override the table name recorded in the export
# table_name = "UsersRestored"

# Create the table when it does not exist
create_table = false

# Delete and recreate the table when it exists (requires create_table)
overwrite_existing = false

# ============================================================================
# Record Import
# ============================================================================
[import]
# Records per group (1-25)
batch_size = 25

# Pause between groups in milliseconds
batch_delay_ms = 100

# Concurrent writes within one group (1-25)
write_concurrency = 1

# Validate and plan without changing DynamoDB
dry_run = false

# Maximum number of failed records listed in the response
max_reported_failures = 100

# ============================================================================
# Table State Polling
# ============================================================================
[table_wait]
# Delay between DescribeTable calls in milliseconds
poll_interval_ms = 5000

# DescribeTable calls before a delete or create is declared timed out
max_poll_attempts = 60

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "./logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
