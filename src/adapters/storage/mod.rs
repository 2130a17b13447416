//! Snapshot sources
//!
//! An export artifact is read either from S3 or, for local testing and
//! air-gapped restores, from a file on disk. Both implement
//! [`SnapshotSource`] so the loader does not care where the bytes come from.

pub mod s3;

use crate::domain::{Result, SnapshotError};
use async_trait::async_trait;
use std::path::PathBuf;

pub use s3::S3SnapshotSource;

/// Where an export artifact lives
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Read the raw artifact bytes
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] (wrapped in `HarborError::Snapshot`) when
    /// the object is missing or cannot be read.
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable location, reported as the response's `sourceFile`
    fn location(&self) -> String;
}

/// Export artifact stored on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    /// Create a source reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for LocalFileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!(path = %self.path.display(), "Reading local export file");
        tokio::fs::read(&self.path).await.map_err(|e| {
            SnapshotError::LocalReadFailed {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
