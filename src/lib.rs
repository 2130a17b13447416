// Harbor - DynamoDB table restore from S3 snapshots
// Copyright (c) 2025 Harbor Contributors
// Licensed under the MIT License

//! # Harbor - DynamoDB table restore from S3 snapshots
//!
//! Harbor restores a DynamoDB table from a JSON export file stored in Amazon
//! S3, optionally creating or replacing the destination table so that it
//! matches the exported schema.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Loading** export files from S3 (or disk) and validating their structure
//! - **Managing** the destination table: detect, delete, create, and wait for
//!   each transition to finish
//! - **Translating** the exported schema into table creation parameters
//! - **Importing** records in paced groups with per-record failure isolation
//!
//! ## Architecture
//!
//! Harbor follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (snapshot, schema, table lifecycle, import)
//! - [`adapters`] - External integrations (S3, DynamoDB)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use harbor::config::load_config_or_default;
//! use harbor::core::import::ImportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = load_config_or_default("harbor.toml")?;
//!     config.source.key = Some("exports/Users.json".to_string());
//!     config.target.create_table = true;
//!
//!     let coordinator = ImportCoordinator::new(config, None).await?;
//!     let response = coordinator.run().await;
//!
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Table Policy
//!
//! The destination table is observed before anything is changed:
//!
//! | table exists | overwrite_existing | create_table | action |
//! |---|---|---|---|
//! | no | any | false | fail |
//! | no | any | true | create |
//! | yes | false | any | fail |
//! | yes | true | false | fail |
//! | yes | true | true | delete, then create |
//!
//! ## Error Handling
//!
//! Harbor uses the [`domain::HarborError`] type for fatal errors. A record the
//! store refuses is not an error: it is counted and listed in the
//! [`core::import::ImportResult`], and the import carries on.
//!
//! ## Logging
//!
//! Harbor uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(table = "Users", records = 53, "Importing records");
//! warn!(table = "Users", index = 7, "Failed to write record");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
