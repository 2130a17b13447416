//! Domain error types
//!
//! This module defines the error hierarchy for Harbor. Fatal errors abort an
//! import run; per-record write failures are not errors at this level and are
//! carried in the import result instead (see [`RecordFailureKind`]).
//! All errors are domain-specific and don't expose AWS SDK types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main Harbor error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum HarborError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No source object key was supplied for the import
    #[error("Missing source key: an S3 object key for the export file is required")]
    MissingSourceKey,

    /// The export file is missing a section or a section cannot be decoded
    #[error("Malformed export: {0}")]
    MalformedExport(String),

    /// Snapshot retrieval errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Destination table lifecycle errors
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl HarborError {
    /// Creates a malformed-export error naming the offending section
    pub fn malformed(section: &str, detail: impl fmt::Display) -> Self {
        HarborError::MalformedExport(format!("section '{section}' {detail}"))
    }
}

/// Errors raised while fetching the export file from blob storage
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The object does not exist
    #[error("Export file not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The object exists but could not be read
    #[error("Failed to read export file s3://{bucket}/{key}: {message}")]
    ReadFailed {
        bucket: String,
        key: String,
        message: String,
    },

    /// A local snapshot file could not be read
    #[error("Failed to read local export file {path}: {message}")]
    LocalReadFailed { path: String, message: String },
}

/// Errors raised by the destination-table lifecycle
///
/// Except for the two policy violations, these leave the destination table in
/// an unspecified state; the message always names the table so an operator
/// can reconcile it.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table exists and overwriting was not requested
    #[error("Table '{0}' already exists and overwrite_existing is false")]
    ExistsNoOverwrite(String),

    /// The table is (or would be) missing and creation was not requested
    #[error("Table '{0}' does not exist and create_table is false")]
    MissingNoCreate(String),

    /// Describing the table failed for a reason other than "not found"
    #[error("Failed to query table '{table}': {message}")]
    LifecycleQueryFailed { table: String, message: String },

    /// The delete request itself was rejected
    #[error("Failed to delete table '{table}': {message}")]
    DeleteFailed { table: String, message: String },

    /// The create request itself was rejected
    #[error("Failed to create table '{table}': {message}")]
    CreateFailed { table: String, message: String },

    /// The table was still visible after the polling budget
    #[error("Table '{table}' still exists after {attempts} polling attempts")]
    DeleteTimeout { table: String, attempts: u32 },

    /// The table did not become active within the polling budget
    #[error("Table '{table}' did not become ACTIVE after {attempts} polling attempts")]
    CreateTimeout { table: String, attempts: u32 },
}

/// Classification of a single record write failure
///
/// Record failures never abort an import; the kind tells the operator whether
/// a re-run is likely to help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFailureKind {
    /// The store rejected the item itself (bad type, missing key, too large)
    Validation,
    /// Throttling or provisioned throughput exceeded
    Throughput,
    /// Network failure, timeout, or an unparseable response
    Connectivity,
    /// Anything else
    Other,
}

impl RecordFailureKind {
    /// Whether re-running the import could reasonably succeed for this record
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            RecordFailureKind::Throughput | RecordFailureKind::Connectivity
        )
    }
}

impl fmt::Display for RecordFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordFailureKind::Validation => "validation",
            RecordFailureKind::Throughput => "throughput",
            RecordFailureKind::Connectivity => "connectivity",
            RecordFailureKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A classified record write failure as reported by a table store
#[derive(Debug, Clone, Error)]
#[error("{kind} failure: {message}")]
pub struct RecordWriteError {
    /// Failure classification
    pub kind: RecordFailureKind,
    /// Store-provided message
    pub message: String,
}

impl RecordWriteError {
    /// Creates a new record write error
    pub fn new(kind: RecordFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for HarborError {
    fn from(err: std::io::Error) -> Self {
        HarborError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for HarborError {
    fn from(err: serde_json::Error) -> Self {
        HarborError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for HarborError {
    fn from(err: toml::de::Error) -> Self {
        HarborError::Configuration(format!("TOML parse error: {err}"))
    }
}
