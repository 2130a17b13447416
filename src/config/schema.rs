//! Configuration schema types
//!
//! Every section has serde defaults, so an empty (or absent) configuration
//! file yields a runnable configuration once a source key is supplied.

use crate::config::SecretString;
use crate::domain::ids::TableName;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest number of records DynamoDB accepts in one batch request; also the
/// upper bound for the import group size.
pub const MAX_BATCH_SIZE: usize = 25;

/// Main Harbor configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarborConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// AWS SDK settings shared by the S3 and DynamoDB clients
    #[serde(default)]
    pub aws: AwsConfig,

    /// Location of the export artifact
    #[serde(default)]
    pub source: SourceConfig,

    /// Destination table and lifecycle policy
    #[serde(default)]
    pub target: TargetConfig,

    /// Record import settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Table state polling
    #[serde(default)]
    pub table_wait: TableWaitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HarborConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.aws.validate()?;
        self.source.validate()?;
        self.target.validate()?;
        self.import.validate()?;
        self.table_wait.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// AWS SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// AWS region for both clients
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint override for LocalStack or DynamoDB Local
    ///
    /// When set, S3 requests use path-style addressing.
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Static access key id (local endpoints only)
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Static secret access key (local endpoints only)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,

    /// Per-operation timeout applied to every SDK call
    #[serde(default = "default_operation_timeout_seconds")]
    pub operation_timeout_seconds: u64,
}

impl AwsConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.region.trim().is_empty() {
            return Err("aws.region cannot be empty".to_string());
        }

        if let Some(endpoint) = &self.endpoint_url {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("aws.endpoint_url must start with http:// or https://".to_string());
            }
        }

        let has_key_id = self
            .access_key_id
            .as_ref()
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false);
        let has_secret = self
            .secret_access_key
            .as_ref()
            .map(|secret| !secret.expose_secret().is_empty())
            .unwrap_or(false);
        if has_key_id != has_secret {
            return Err(
                "aws.access_key_id and aws.secret_access_key must be set together".to_string(),
            );
        }

        if self.operation_timeout_seconds == 0 {
            return Err("aws.operation_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }

    /// Returns the operation timeout as a Duration
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_seconds)
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint_url: None,
            access_key_id: None,
            secret_access_key: None,
            operation_timeout_seconds: default_operation_timeout_seconds(),
        }
    }
}

/// Export artifact location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// S3 bucket holding exports
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Object key of the export file; required for an import
    #[serde(default)]
    pub key: Option<String>,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bucket.trim().is_empty() {
            return Err("source.bucket cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            key: None,
        }
    }
}

/// Destination table configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Overrides the table name recorded in the export
    #[serde(default)]
    pub table_name: Option<String>,

    /// Create the table when it does not exist
    #[serde(default)]
    pub create_table: bool,

    /// Delete and recreate the table when it exists
    #[serde(default)]
    pub overwrite_existing: bool,
}

impl TargetConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.table_name {
            TableName::new(name.as_str()).map_err(|e| format!("target.table_name: {e}"))?;
        }
        Ok(())
    }
}

/// Record import configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Records per group (1 to 25)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between groups in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Concurrent writes within one group
    #[serde(default = "default_write_concurrency")]
    pub write_concurrency: usize,

    /// Plan the import without touching the destination
    #[serde(default)]
    pub dry_run: bool,

    /// Cap on the failure list carried in the response body
    #[serde(default = "default_max_reported_failures")]
    pub max_reported_failures: usize,
}

impl ImportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(format!(
                "import.batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            ));
        }

        if self.write_concurrency == 0 || self.write_concurrency > MAX_BATCH_SIZE {
            return Err(format!(
                "import.write_concurrency must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.write_concurrency
            ));
        }

        Ok(())
    }

    /// Returns the inter-batch delay as a Duration
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
            write_concurrency: default_write_concurrency(),
            dry_run: false,
            max_reported_failures: default_max_reported_failures(),
        }
    }
}

/// Table state polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableWaitConfig {
    /// Delay between state checks in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// State checks before a transition is declared timed out
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl TableWaitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("table_wait.poll_interval_ms must be > 0".to_string());
        }
        if self.max_poll_attempts == 0 {
            return Err("table_wait.max_poll_attempts must be > 0".to_string());
        }
        Ok(())
    }

    /// Returns the poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for TableWaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_operation_timeout_seconds() -> u64 {
    60
}

fn default_bucket() -> String {
    "dynamodb-table-exports".to_string()
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_batch_delay_ms() -> u64 {
    100
}

fn default_write_concurrency() -> usize {
    1
}

fn default_max_reported_failures() -> usize {
    100
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_max_poll_attempts() -> u32 {
    60
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
