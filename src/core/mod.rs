//! Core business logic for Harbor.
//!
//! # Modules
//!
//! - [`snapshot`] - Export file loading and validation
//! - [`schema`] - Exported schema to table creation parameters
//! - [`table`] - Destination table lifecycle and state polling
//! - [`import`] - Batched record import and orchestration
//!
//! # Import Workflow
//!
//! 1. **Load**: Fetch the export file from S3 (or disk) and parse it
//! 2. **Validate**: Check the `metadata`, `schema` and `records` sections
//! 3. **Plan**: Observe the destination table and apply the table policy
//! 4. **Prepare**: Delete and/or create the table, polling each transition
//! 5. **Import**: Write records in paced groups, isolating failures
//! 6. **Report**: Build the `{statusCode, body}` response
//!
//! # Example
//!
//! ```rust,no_run
//! use harbor::config::load_config;
//! use harbor::core::import::ImportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("harbor.toml")?;
//!
//! let coordinator = ImportCoordinator::new(config, None).await?;
//! let response = coordinator.run().await;
//!
//! println!("Status: {}", response.status_code);
//! # Ok(())
//! # }
//! ```

pub mod import;
pub mod schema;
pub mod snapshot;
pub mod table;
