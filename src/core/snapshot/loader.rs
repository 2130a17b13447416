//! Snapshot loading
//!
//! Fetches the export artifact through a [`SnapshotSource`], parses it, and
//! hands the candidate to the validator.

use super::validate::decode_artifact;
use crate::adapters::storage::SnapshotSource;
use crate::config::SourceConfig;
use crate::domain::{ExportArtifact, HarborError, Result};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolved location of an export artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLocation {
    /// Object in an S3 bucket
    S3 { bucket: String, key: String },
    /// File on the local filesystem
    LocalFile(PathBuf),
}

impl SnapshotLocation {
    /// Resolves the artifact location from configuration
    ///
    /// A local file, when given, takes precedence over S3.
    ///
    /// # Errors
    ///
    /// Returns [`HarborError::MissingSourceKey`] if no local file is given and
    /// no (non-blank) S3 object key is configured.
    pub fn resolve(source: &SourceConfig, local_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = local_file {
            return Ok(SnapshotLocation::LocalFile(path.to_path_buf()));
        }

        match source.key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(SnapshotLocation::S3 {
                bucket: source.bucket.clone(),
                key: key.to_string(),
            }),
            _ => Err(HarborError::MissingSourceKey),
        }
    }
}

impl fmt::Display for SnapshotLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotLocation::S3 { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            SnapshotLocation::LocalFile(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parses raw artifact bytes into an unvalidated JSON candidate
pub fn parse_candidate(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| {
        HarborError::MalformedExport(format!("export file is not valid JSON: {e}"))
    })
}

/// Loads export artifacts from a single source
pub struct SnapshotLoader {
    source: Arc<dyn SnapshotSource + Send + Sync>,
}

impl SnapshotLoader {
    /// Create a loader for `source`
    pub fn new(source: Arc<dyn SnapshotSource + Send + Sync>) -> Self {
        Self { source }
    }

    /// Location of the artifact, as reported in the response
    pub fn location(&self) -> String {
        self.source.location()
    }

    /// Fetches and parses the artifact without validating it
    pub async fn load_candidate(&self) -> Result<Value> {
        let bytes = self.source.fetch().await?;
        tracing::debug!(
            location = %self.source.location(),
            size_bytes = bytes.len(),
            "Parsing export file"
        );
        parse_candidate(&bytes)
    }

    /// Fetches, parses and validates the artifact
    pub async fn load(&self) -> Result<ExportArtifact> {
        let candidate = self.load_candidate().await?;
        let artifact = decode_artifact(candidate)?;

        tracing::info!(
            location = %self.source.location(),
            table = %artifact.schema.table_name,
            records = artifact.record_count(),
            "Export file loaded"
        );

        Ok(artifact)
    }
}
