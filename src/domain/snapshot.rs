//! Export artifact domain model
//!
//! The schema section mirrors the shape returned by DynamoDB's DescribeTable,
//! so an export produced from a DescribeTable response round-trips without
//! reshaping. Fields the importer does not use (table status, item counts,
//! ARNs and so on) are ignored on deserialization.

use super::ids::{IndexName, TableName};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One exported item: attribute name to native JSON value
pub type Record = Map<String, Value>;

/// A loaded export artifact
///
/// Immutable once loaded; owned by the import coordinator for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    /// Opaque provenance information written by the exporter
    pub metadata: Value,
    /// Exported table schema
    pub schema: TableSchema,
    /// Records in export order
    pub records: Vec<Record>,
}

impl ExportArtifact {
    /// Looks up a string field in the metadata section, if the metadata is an object
    pub fn metadata_str(&self, field: &str) -> Option<&str> {
        self.metadata.get(field).and_then(Value::as_str)
    }

    /// Number of records in the artifact
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Role of a key attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyRole {
    /// Partition key
    #[serde(rename = "HASH")]
    Partition,
    /// Sort key
    #[serde(rename = "RANGE")]
    Sort,
}

/// Scalar attribute types allowed for key attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    #[serde(rename = "S")]
    String,
    #[serde(rename = "N")]
    Number,
    #[serde(rename = "B")]
    Binary,
}

/// Billing/capacity mode of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BillingMode {
    /// Pay per request
    #[default]
    #[serde(rename = "PAY_PER_REQUEST", alias = "ON_DEMAND")]
    OnDemand,
    /// Fixed read/write capacity
    #[serde(rename = "PROVISIONED")]
    Provisioned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: KeyRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: ScalarType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BillingModeSummary {
    #[serde(default)]
    pub billing_mode: Option<BillingMode>,
}

/// Read/write capacity units; either may be missing in an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisionedThroughput {
    #[serde(default)]
    pub read_capacity_units: Option<i64>,
    #[serde(default)]
    pub write_capacity_units: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectionType {
    #[default]
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "KEYS_ONLY")]
    KeysOnly,
    #[serde(rename = "INCLUDE")]
    Include,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Projection {
    #[serde(default)]
    pub projection_type: Option<ProjectionType>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub non_key_attributes: Vec<String>,
}

/// Whether an index spans the whole table or one partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexScope {
    Global,
    Local,
}

impl std::fmt::Display for IndexScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexScope::Global => f.write_str("global"),
            IndexScope::Local => f.write_str("local"),
        }
    }
}

/// Secondary index definition
///
/// The scope is implied by which list of the schema the index appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexDef {
    pub index_name: IndexName,
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(default)]
    pub projection: Projection,
    #[serde(default)]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

impl IndexDef {
    /// Name of the index partition key attribute, if declared
    pub fn partition_key(&self) -> Option<&str> {
        key_named(&self.key_schema, KeyRole::Partition)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamViewType {
    #[serde(rename = "KEYS_ONLY")]
    KeysOnly,
    #[serde(rename = "NEW_IMAGE")]
    NewImage,
    #[serde(rename = "OLD_IMAGE")]
    OldImage,
    #[serde(rename = "NEW_AND_OLD_IMAGES")]
    NewAndOldImages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamSpecification {
    pub stream_enabled: bool,
    #[serde(default)]
    pub stream_view_type: Option<StreamViewType>,
}

/// Exported table schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableSchema {
    pub table_name: TableName,
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attribute_definitions: Vec<AttributeDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_mode_summary: Option<BillingModeSummary>,
    /// Flat form accepted for exports written by hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_mode: Option<BillingMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioned_throughput: Option<ProvisionedThroughput>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub global_secondary_indexes: Vec<IndexDef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub local_secondary_indexes: Vec<IndexDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_specification: Option<StreamSpecification>,
}

impl TableSchema {
    /// Effective billing mode; on-demand when the export does not say
    pub fn billing_mode(&self) -> BillingMode {
        self.billing_mode_summary
            .and_then(|summary| summary.billing_mode)
            .or(self.billing_mode)
            .unwrap_or_default()
    }

    /// Name of the partition key attribute, if declared
    pub fn partition_key(&self) -> Option<&str> {
        key_named(&self.key_schema, KeyRole::Partition)
    }

    /// Name of the sort key attribute, if declared
    pub fn sort_key(&self) -> Option<&str> {
        key_named(&self.key_schema, KeyRole::Sort)
    }

    /// Declared scalar type of an attribute
    pub fn attribute_type(&self, name: &str) -> Option<ScalarType> {
        self.attribute_definitions
            .iter()
            .find(|def| def.attribute_name == name)
            .map(|def| def.attribute_type)
    }

    /// All secondary indexes with their scope, globals first
    pub fn indexes(&self) -> impl Iterator<Item = (IndexScope, &IndexDef)> {
        self.global_secondary_indexes
            .iter()
            .map(|index| (IndexScope::Global, index))
            .chain(
                self.local_secondary_indexes
                    .iter()
                    .map(|index| (IndexScope::Local, index)),
            )
    }

    /// Attribute names referenced by the table key or any index key, in first-seen order
    pub fn referenced_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let keys = self
            .key_schema
            .iter()
            .chain(self.indexes().flat_map(|(_, index)| index.key_schema.iter()));
        for element in keys {
            if !names.contains(&element.attribute_name.as_str()) {
                names.push(element.attribute_name.as_str());
            }
        }
        names
    }
}

fn key_named(keys: &[KeySchemaElement], role: KeyRole) -> Option<&str> {
    keys.iter()
        .find(|element| element.key_type == role)
        .map(|element| element.attribute_name.as_str())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
