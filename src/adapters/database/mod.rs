//! Table store abstraction layer
//!
//! This module provides the trait the import core writes through and the
//! factory functions that build the AWS-backed implementations.

pub mod factory;
pub mod traits;

pub use factory::{create_snapshot_source, create_table_store, load_sdk_config};
pub use traits::TableStore;
