//! External system integrations for Harbor.
//!
//! - [`database`] - Table store abstraction and the AWS client factory
//! - [`dynamodb`] - Amazon DynamoDB implementation of the table store
//! - [`storage`] - Snapshot sources (Amazon S3 and local files)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the AWS SDKs and
//! enable testing with in-memory implementations. The import core only sees
//! the [`TableStore`](database::TableStore) and
//! [`SnapshotSource`](storage::SnapshotSource) traits.
//!
//! ```rust,no_run
//! use harbor::adapters::database::{create_table_store, load_sdk_config};
//! use harbor::config::AwsConfig;
//!
//! # async fn example() {
//! let aws = AwsConfig::default();
//! let sdk_config = load_sdk_config(&aws).await;
//! let store = create_table_store(&sdk_config);
//! println!("Writing through {}", store.store_name());
//! # }
//! ```

pub mod database;
pub mod dynamodb;
pub mod storage;

#[cfg(test)]
pub mod mock;
