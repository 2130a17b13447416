//! Amazon DynamoDB adapter
//!
//! - [`client`] - [`DynamoDbTableStore`], the [`TableStore`](crate::adapters::database::TableStore) implementation
//! - [`models`] - JSON record and table definition conversions, error classification

pub mod client;
pub mod models;

pub use client::DynamoDbTableStore;
