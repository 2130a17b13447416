//! Export artifact loading and validation

pub mod loader;
pub mod validate;

pub use loader::{parse_candidate, SnapshotLoader, SnapshotLocation};
pub use validate::{decode_artifact, validate_schema, validate_sections, REQUIRED_SECTIONS};
