//! Table store abstraction
//!
//! This module defines the trait the destination store adapter implements.
//! The lifecycle manager and the batch importer depend only on this trait,
//! which keeps AWS SDK types out of the core and lets tests substitute an
//! in-memory store.

use crate::core::schema::TableDefinition;
use crate::core::table::TableState;
use crate::domain::{Record, RecordWriteError, Result, TableName};
use async_trait::async_trait;

/// Destination key-value store operations used by an import
///
/// Only the DescribeTable, DeleteTable, CreateTable and PutItem permissions
/// are exercised through this trait.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Observe the current state of a table
    ///
    /// # Errors
    ///
    /// "Not found" is reported as [`TableState::Absent`]; any other failure
    /// is a `TableError::LifecycleQueryFailed`.
    async fn table_state(&self, table: &TableName) -> Result<TableState>;

    /// Request deletion of a table
    ///
    /// Returns once the request is accepted, not once the table is gone. A
    /// "not found" answer means the table is already gone and is not an error.
    ///
    /// # Errors
    ///
    /// Returns `TableError::DeleteFailed` if the request is rejected.
    async fn delete_table(&self, table: &TableName) -> Result<()>;

    /// Request creation of a table
    ///
    /// Returns once the request is accepted, not once the table is active.
    ///
    /// # Errors
    ///
    /// Returns `TableError::CreateFailed` if the request is rejected.
    async fn create_table(&self, definition: &TableDefinition) -> Result<()>;

    /// Write a single record
    ///
    /// # Errors
    ///
    /// Returns a classified [`RecordWriteError`]; callers isolate it to the
    /// record and carry on.
    async fn put_record(
        &self,
        table: &TableName,
        record: &Record,
    ) -> std::result::Result<(), RecordWriteError>;

    /// Short name of the backing store, for logs
    fn store_name(&self) -> &str;
}
