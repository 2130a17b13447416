//! Configuration management for Harbor.
//!
//! Harbor reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - `HARBOR_<SECTION>_<KEY>` environment overrides
//! - Validation with readable messages
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use harbor::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("harbor.toml")?;
//!
//! println!("Bucket: {}", config.source.bucket);
//! println!("Batch size: {}", config.import.batch_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`AwsConfig`] - Region, endpoint override, static credentials, timeout
//! - [`SourceConfig`] - Export bucket and object key
//! - [`TargetConfig`] - Destination table name and lifecycle flags
//! - [`ImportConfig`] - Batch size, pacing, concurrency, dry run
//! - [`TableWaitConfig`] - Table state polling budget
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [aws]
//! region = "us-east-1"
//!
//! [source]
//! bucket = "dynamodb-table-exports"
//! key = "exports/Users-2025-01-01.json"
//!
//! [target]
//! create_table = true
//! overwrite_existing = false
//!
//! [import]
//! batch_size = 25
//! batch_delay_ms = 100
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, AwsConfig, HarborConfig, ImportConfig, LoggingConfig, SourceConfig,
    TableWaitConfig, TargetConfig, MAX_BATCH_SIZE,
};
pub use secret::{secret_string, SecretString, SecretValue};
