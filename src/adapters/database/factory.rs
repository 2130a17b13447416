//! AWS client factory
//!
//! One [`SdkConfig`] is loaded per run and both service clients are built
//! from it, so region, credentials, endpoint and timeouts are shared.

use crate::adapters::database::traits::TableStore;
use crate::adapters::dynamodb::DynamoDbTableStore;
use crate::adapters::storage::{LocalFileSource, S3SnapshotSource, SnapshotSource};
use crate::config::AwsConfig;
use crate::core::snapshot::SnapshotLocation;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::sync::Arc;

/// Loads the shared AWS SDK configuration
///
/// Static credentials are applied only when both halves are configured;
/// otherwise the SDK's default provider chain is used.
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    use secrecy::ExposeSecret;

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(config.operation_timeout())
                .build(),
        );

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key_id), Some(secret)) =
        (&config.access_key_id, &config.secret_access_key)
    {
        let credentials = aws_sdk_dynamodb::config::Credentials::new(
            access_key_id.clone(),
            secret.expose_secret().as_str().to_string(),
            None,
            None,
            "harbor-config",
        );
        loader = loader.credentials_provider(credentials);
    }

    tracing::debug!(
        region = %config.region,
        endpoint = ?config.endpoint_url,
        static_credentials = config.access_key_id.is_some(),
        "Loading AWS configuration"
    );

    loader.load().await
}

/// Create the destination table store
pub fn create_table_store(sdk_config: &SdkConfig) -> Arc<dyn TableStore + Send + Sync> {
    tracing::info!("Creating DynamoDB client");
    let client = aws_sdk_dynamodb::Client::new(sdk_config);
    Arc::new(DynamoDbTableStore::new(client)) as Arc<dyn TableStore + Send + Sync>
}

/// Create the snapshot source for a resolved location
///
/// Endpoint overrides point at S3-compatible services (LocalStack, MinIO)
/// that need path-style addressing.
pub fn create_snapshot_source(
    sdk_config: &SdkConfig,
    config: &AwsConfig,
    location: &SnapshotLocation,
) -> Arc<dyn SnapshotSource + Send + Sync> {
    match location {
        SnapshotLocation::S3 { bucket, key } => {
            tracing::info!("Creating S3 client");
            let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
                .force_path_style(config.endpoint_url.is_some())
                .build();
            let client = aws_sdk_s3::Client::from_conf(s3_config);
            Arc::new(S3SnapshotSource::new(client, bucket.clone(), key.clone()))
        }
        SnapshotLocation::LocalFile(path) => Arc::new(LocalFileSource::new(path.clone())),
    }
}
