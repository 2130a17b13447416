//! Domain models and types for Harbor.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TableName`], [`IndexName`])
//! - **Export artifact model** ([`ExportArtifact`], [`TableSchema`], [`Record`])
//! - **Error types** ([`HarborError`], [`SnapshotError`], [`TableError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, HarborError>`]:
//!
//! ```rust
//! use harbor::domain::{HarborError, Result, TableName};
//!
//! fn target(name: &str) -> Result<TableName> {
//!     TableName::new(name).map_err(HarborError::Validation)
//! }
//!
//! assert!(target("Users").is_ok());
//! assert!(target("no spaces").is_err());
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use errors::{
    HarborError, RecordFailureKind, RecordWriteError, SnapshotError, TableError,
};
pub use ids::{IndexName, TableName};
pub use result::Result;
pub use snapshot::{
    AttributeDefinition, BillingMode, ExportArtifact, IndexDef, IndexScope, KeyRole,
    KeySchemaElement, Projection, ProjectionType, ProvisionedThroughput, Record, ScalarType,
    StreamSpecification, StreamViewType, TableSchema,
};
