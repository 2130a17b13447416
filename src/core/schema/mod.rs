//! Schema translation
//!
//! Maps an exported [`TableSchema`](crate::domain::TableSchema) into the
//! parameters used to create the destination table.

pub mod translate;

pub use translate::{
    translate_schema, Capacity, IndexDefinition, ProjectionSpec, TableDefinition,
    DEFAULT_CAPACITY_UNITS,
};
