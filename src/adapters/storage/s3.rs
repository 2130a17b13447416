//! Amazon S3 snapshot source

use super::SnapshotSource;
use crate::domain::{Result, SnapshotError};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client;

/// Export artifact stored as an S3 object
///
/// Only `s3:GetObject` is used.
#[derive(Clone)]
pub struct S3SnapshotSource {
    client: Client,
    bucket: String,
    key: String,
}

impl std::fmt::Debug for S3SnapshotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3SnapshotSource")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .finish()
    }
}

impl S3SnapshotSource {
    /// Create a source for `s3://bucket/key` using a shared client
    pub fn new(client: Client, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    fn read_failed(&self, message: String) -> SnapshotError {
        SnapshotError::ReadFailed {
            bucket: self.bucket.clone(),
            key: self.key.clone(),
            message,
        }
    }
}

#[async_trait]
impl SnapshotSource for S3SnapshotSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::info!(bucket = %self.bucket, key = %self.key, "Fetching export file from S3");

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .map_err(|err| {
                if matches!(err.as_service_error(), Some(GetObjectError::NoSuchKey(_))) {
                    SnapshotError::NotFound {
                        bucket: self.bucket.clone(),
                        key: self.key.clone(),
                    }
                } else {
                    self.read_failed(DisplayErrorContext(&err).to_string())
                }
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| self.read_failed(e.to_string()))?
            .into_bytes();

        tracing::debug!(
            bucket = %self.bucket,
            key = %self.key,
            size_bytes = bytes.len(),
            "Export file downloaded"
        );

        Ok(bytes.to_vec())
    }

    fn location(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}
