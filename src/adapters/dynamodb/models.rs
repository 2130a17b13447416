//! Conversions between Harbor types and DynamoDB SDK types

use crate::core::schema::{Capacity, IndexDefinition, ProjectionSpec};
use crate::domain::snapshot::{
    AttributeDefinition, BillingMode, KeyRole, KeySchemaElement, ProjectionType, Record,
    ScalarType, StreamSpecification, StreamViewType,
};
use crate::domain::RecordFailureKind;
use aws_sdk_dynamodb::error::{BuildError, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types as ddb;
use aws_sdk_dynamodb::types::AttributeValue;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use std::collections::HashMap;

/// Key of the single-entry object that marks a base64-encoded binary value
pub const BINARY_TAG: &str = "__binary__";

/// Converts an exported record into a DynamoDB item
///
/// # Errors
///
/// Returns a message naming the offending attribute if a tagged binary value
/// is not valid base64.
pub fn record_to_item(record: &Record) -> Result<HashMap<String, AttributeValue>, String> {
    record
        .iter()
        .map(|(name, value)| {
            to_attribute_value(value)
                .map(|attr| (name.clone(), attr))
                .map_err(|e| format!("attribute '{name}': {e}"))
        })
        .collect()
}

/// Converts one native JSON value into a DynamoDB attribute value
pub fn to_attribute_value(value: &Value) -> Result<AttributeValue, String> {
    match value {
        Value::Null => Ok(AttributeValue::Null(true)),
        Value::Bool(b) => Ok(AttributeValue::Bool(*b)),
        Value::Number(n) => Ok(AttributeValue::N(n.to_string())),
        Value::String(s) => Ok(AttributeValue::S(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(to_attribute_value)
            .collect::<Result<Vec<_>, _>>()
            .map(AttributeValue::L),
        Value::Object(map) => {
            if let (1, Some(Value::String(encoded))) = (map.len(), map.get(BINARY_TAG)) {
                return BASE64
                    .decode(encoded)
                    .map(|bytes| AttributeValue::B(Blob::new(bytes)))
                    .map_err(|e| format!("invalid base64 binary value: {e}"));
            }
            record_to_item(map).map(AttributeValue::M)
        }
    }
}

pub fn key_type(role: KeyRole) -> ddb::KeyType {
    match role {
        KeyRole::Partition => ddb::KeyType::Hash,
        KeyRole::Sort => ddb::KeyType::Range,
    }
}

pub fn scalar_type(scalar: ScalarType) -> ddb::ScalarAttributeType {
    match scalar {
        ScalarType::String => ddb::ScalarAttributeType::S,
        ScalarType::Number => ddb::ScalarAttributeType::N,
        ScalarType::Binary => ddb::ScalarAttributeType::B,
    }
}

pub fn billing_mode(mode: BillingMode) -> ddb::BillingMode {
    match mode {
        BillingMode::OnDemand => ddb::BillingMode::PayPerRequest,
        BillingMode::Provisioned => ddb::BillingMode::Provisioned,
    }
}

pub fn projection_type(projection: ProjectionType) -> ddb::ProjectionType {
    match projection {
        ProjectionType::All => ddb::ProjectionType::All,
        ProjectionType::KeysOnly => ddb::ProjectionType::KeysOnly,
        ProjectionType::Include => ddb::ProjectionType::Include,
    }
}

pub fn stream_view_type(view: StreamViewType) -> ddb::StreamViewType {
    match view {
        StreamViewType::KeysOnly => ddb::StreamViewType::KeysOnly,
        StreamViewType::NewImage => ddb::StreamViewType::NewImage,
        StreamViewType::OldImage => ddb::StreamViewType::OldImage,
        StreamViewType::NewAndOldImages => ddb::StreamViewType::NewAndOldImages,
    }
}

pub fn key_schema(keys: &[KeySchemaElement]) -> Result<Vec<ddb::KeySchemaElement>, BuildError> {
    keys.iter()
        .map(|element| {
            ddb::KeySchemaElement::builder()
                .attribute_name(&element.attribute_name)
                .key_type(key_type(element.key_type))
                .build()
        })
        .collect()
}

pub fn attribute_definitions(
    definitions: &[AttributeDefinition],
) -> Result<Vec<ddb::AttributeDefinition>, BuildError> {
    definitions
        .iter()
        .map(|def| {
            ddb::AttributeDefinition::builder()
                .attribute_name(&def.attribute_name)
                .attribute_type(scalar_type(def.attribute_type))
                .build()
        })
        .collect()
}

pub fn throughput(capacity: Capacity) -> Result<ddb::ProvisionedThroughput, BuildError> {
    ddb::ProvisionedThroughput::builder()
        .read_capacity_units(capacity.read_units)
        .write_capacity_units(capacity.write_units)
        .build()
}

pub fn projection(spec: &ProjectionSpec) -> ddb::Projection {
    let non_key_attributes =
        (!spec.non_key_attributes.is_empty()).then(|| spec.non_key_attributes.clone());
    ddb::Projection::builder()
        .projection_type(projection_type(spec.projection_type))
        .set_non_key_attributes(non_key_attributes)
        .build()
}

pub fn global_index(index: &IndexDefinition) -> Result<ddb::GlobalSecondaryIndex, BuildError> {
    let throughput = index.capacity.map(throughput).transpose()?;
    ddb::GlobalSecondaryIndex::builder()
        .index_name(index.name.as_str())
        .set_key_schema(Some(key_schema(&index.key_schema)?))
        .projection(projection(&index.projection))
        .set_provisioned_throughput(throughput)
        .build()
}

pub fn local_index(index: &IndexDefinition) -> Result<ddb::LocalSecondaryIndex, BuildError> {
    ddb::LocalSecondaryIndex::builder()
        .index_name(index.name.as_str())
        .set_key_schema(Some(key_schema(&index.key_schema)?))
        .projection(projection(&index.projection))
        .build()
}

pub fn stream_specification(
    stream: StreamSpecification,
) -> Result<ddb::StreamSpecification, BuildError> {
    ddb::StreamSpecification::builder()
        .stream_enabled(stream.stream_enabled)
        .set_stream_view_type(stream.stream_view_type.map(stream_view_type))
        .build()
}

/// Maps a table status to whether the table is usable
pub fn is_active(status: Option<&ddb::TableStatus>) -> bool {
    matches!(status, Some(ddb::TableStatus::Active))
}

/// Classifies a failed PutItem call
pub fn classify_put_error<R>(err: &SdkError<PutItemError, R>) -> RecordFailureKind {
    match err {
        SdkError::ServiceError(service) => classify_put_service_error(service.err()),
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) | SdkError::ResponseError(_) => {
            RecordFailureKind::Connectivity
        }
        _ => RecordFailureKind::Other,
    }
}

/// Classifies a PutItem service error by its modeled variant or error code
pub fn classify_put_service_error(err: &PutItemError) -> RecordFailureKind {
    match err {
        PutItemError::ProvisionedThroughputExceededException(_)
        | PutItemError::RequestLimitExceeded(_) => RecordFailureKind::Throughput,
        PutItemError::ConditionalCheckFailedException(_)
        | PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            RecordFailureKind::Validation
        }
        _ => match err.code() {
            Some("ValidationException") | Some("SerializationException") => {
                RecordFailureKind::Validation
            }
            Some("ThrottlingException") | Some("ProvisionedThroughputExceededException") => {
                RecordFailureKind::Throughput
            }
            _ => RecordFailureKind::Other,
        },
    }
}
