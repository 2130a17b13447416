//! Exported schema to table creation parameters
//!
//! The output is a store-neutral [`TableDefinition`]; the DynamoDB adapter
//! turns it into SDK request builders.

use crate::domain::snapshot::{
    AttributeDefinition, BillingMode, IndexDef, KeyRole, KeySchemaElement, ProjectionType,
    ProvisionedThroughput, StreamSpecification, TableSchema,
};
use crate::domain::{IndexName, TableName};

/// Capacity units applied when a provisioned export omits them (or records zero)
pub const DEFAULT_CAPACITY_UNITS: i64 = 5;

/// Read/write capacity for a provisioned table or global index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub read_units: i64,
    pub write_units: i64,
}

impl Capacity {
    /// Capacity from an exported throughput block, defaulting missing or non-positive units
    pub fn from_export(throughput: Option<&ProvisionedThroughput>) -> Self {
        let units = |value: Option<i64>| match value {
            Some(units) if units > 0 => units,
            _ => DEFAULT_CAPACITY_UNITS,
        };
        Self {
            read_units: units(throughput.and_then(|t| t.read_capacity_units)),
            write_units: units(throughput.and_then(|t| t.write_capacity_units)),
        }
    }
}

/// Index projection with an explicit type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSpec {
    pub projection_type: ProjectionType,
    /// Only populated for INCLUDE projections
    pub non_key_attributes: Vec<String>,
}

/// Secondary index creation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub name: IndexName,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: ProjectionSpec,
    /// Present only for global indexes under provisioned billing
    pub capacity: Option<Capacity>,
}

/// Everything needed to issue a create-table request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub table_name: TableName,
    pub key_schema: Vec<KeySchemaElement>,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub billing_mode: BillingMode,
    /// Present only under provisioned billing
    pub capacity: Option<Capacity>,
    pub global_secondary_indexes: Vec<IndexDefinition>,
    pub local_secondary_indexes: Vec<IndexDefinition>,
    pub stream_specification: Option<StreamSpecification>,
}

impl TableDefinition {
    /// Total number of secondary indexes
    pub fn index_count(&self) -> usize {
        self.global_secondary_indexes.len() + self.local_secondary_indexes.len()
    }
}

/// Translates an exported schema into creation parameters for `table_name`
///
/// The destination name is passed separately because callers may restore
/// under a different name than the one recorded in the export.
pub fn translate_schema(schema: &TableSchema, table_name: &TableName) -> TableDefinition {
    let billing_mode = schema.billing_mode();
    let provisioned = billing_mode == BillingMode::Provisioned;

    let capacity =
        provisioned.then(|| Capacity::from_export(schema.provisioned_throughput.as_ref()));

    let global_secondary_indexes = schema
        .global_secondary_indexes
        .iter()
        .map(|index| {
            let capacity =
                provisioned.then(|| Capacity::from_export(index.provisioned_throughput.as_ref()));
            translate_index(index, capacity)
        })
        .collect();

    let local_secondary_indexes = schema
        .local_secondary_indexes
        .iter()
        .map(|index| translate_index(index, None))
        .collect();

    // DynamoDB rejects definitions for attributes no key or index uses
    let attribute_definitions = schema
        .referenced_attributes()
        .into_iter()
        .filter_map(|name| {
            schema.attribute_type(name).map(|attribute_type| AttributeDefinition {
                attribute_name: name.to_string(),
                attribute_type,
            })
        })
        .collect();

    TableDefinition {
        table_name: table_name.clone(),
        key_schema: ordered_keys(&schema.key_schema),
        attribute_definitions,
        billing_mode,
        capacity,
        global_secondary_indexes,
        local_secondary_indexes,
        stream_specification: schema.stream_specification,
    }
}

fn translate_index(index: &IndexDef, capacity: Option<Capacity>) -> IndexDefinition {
    let projection_type = index.projection.projection_type.unwrap_or_default();
    let non_key_attributes = if projection_type == ProjectionType::Include {
        index.projection.non_key_attributes.clone()
    } else {
        Vec::new()
    };

    IndexDefinition {
        name: index.index_name.clone(),
        key_schema: ordered_keys(&index.key_schema),
        projection: ProjectionSpec {
            projection_type,
            non_key_attributes,
        },
        capacity,
    }
}

/// Partition key first, then sort key
fn ordered_keys(keys: &[KeySchemaElement]) -> Vec<KeySchemaElement> {
    let mut ordered = keys.to_vec();
    ordered.sort_by_key(|element| match element.key_type {
        KeyRole::Partition => 0,
        KeyRole::Sort => 1,
    });
    ordered
}
