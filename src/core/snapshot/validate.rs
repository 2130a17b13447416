//! Export artifact validation
//!
//! Runs before any call to the destination store. Every failure is a
//! `MalformedExport` naming the section at fault.

use crate::domain::snapshot::{ExportArtifact, IndexScope, KeyRole, Record, TableSchema};
use crate::domain::{HarborError, Result};
use serde_json::Value;
use std::collections::HashSet;

/// Top-level sections every export must carry, in the order they are checked
pub const REQUIRED_SECTIONS: [&str; 3] = ["metadata", "schema", "records"];

/// Checks that all required sections are present and non-null
///
/// # Errors
///
/// Names the first missing section in [`REQUIRED_SECTIONS`] order.
pub fn validate_sections(document: &Value) -> Result<()> {
    let object = document.as_object().ok_or_else(|| {
        HarborError::MalformedExport("export file must be a JSON object".to_string())
    })?;

    for section in REQUIRED_SECTIONS {
        match object.get(section) {
            None | Some(Value::Null) => {
                return Err(HarborError::malformed(section, "is missing or null"));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Validates a parsed candidate and decodes it into an [`ExportArtifact`]
pub fn decode_artifact(mut document: Value) -> Result<ExportArtifact> {
    validate_sections(&document)?;

    let metadata = document["metadata"].take();

    let schema: TableSchema = serde_json::from_value(document["schema"].take())
        .map_err(|e| HarborError::malformed("schema", format!("cannot be decoded: {e}")))?;
    validate_schema(&schema)?;

    let records = decode_records(document["records"].take())?;

    Ok(ExportArtifact {
        metadata,
        schema,
        records,
    })
}

fn decode_records(value: Value) -> Result<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(HarborError::malformed("records", "must be an array"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(HarborError::malformed(
                "records",
                format!("item {index} is not an object (found {})", json_kind(&other)),
            )),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Checks the key and index invariants of a decoded schema
pub fn validate_schema(schema: &TableSchema) -> Result<()> {
    let invalid = |detail: String| HarborError::malformed("schema", detail);

    check_key_roles(&schema.key_schema).map_err(|e| invalid(format!("table key: {e}")))?;

    let mut index_names = HashSet::new();
    for (scope, index) in schema.indexes() {
        let name = index.index_name.as_str();
        if !index_names.insert(name) {
            return Err(invalid(format!("duplicate index name '{name}'")));
        }

        check_key_roles(&index.key_schema)
            .map_err(|e| invalid(format!("{scope} index '{name}': {e}")))?;

        if scope == IndexScope::Local {
            if index.partition_key() != schema.partition_key() {
                return Err(invalid(format!(
                    "local index '{name}' must use the table partition key"
                )));
            }
            if schema.sort_key().is_none() {
                return Err(invalid(format!(
                    "local index '{name}' requires the table to have a sort key"
                )));
            }
        }
    }

    for attribute in schema.referenced_attributes() {
        if schema.attribute_type(attribute).is_none() {
            return Err(invalid(format!(
                "attribute '{attribute}' is used by a key but has no AttributeDefinitions entry"
            )));
        }
    }

    Ok(())
}

fn check_key_roles(keys: &[crate::domain::KeySchemaElement]) -> std::result::Result<(), String> {
    let partitions = keys
        .iter()
        .filter(|k| k.key_type == KeyRole::Partition)
        .count();
    let sorts = keys.iter().filter(|k| k.key_type == KeyRole::Sort).count();

    if partitions != 1 {
        return Err(format!("expected exactly one HASH key, found {partitions}"));
    }
    if sorts > 1 {
        return Err(format!("expected at most one RANGE key, found {sorts}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn users_document() -> Value {
        json!({
            "metadata": {"exportDate": "2025-01-01T00:00:00Z", "itemCount": 2},
            "schema": {
                "TableName": "Users",
                "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
                "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}]
            },
            "records": [{"id": "a"}, {"id": "b", "age": 3}]
        })
    }

    fn message(err: HarborError) -> String {
        match err {
            HarborError::MalformedExport(message) => message,
            other => panic!("expected MalformedExport, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_document_decodes() {
        let artifact = decode_artifact(users_document()).unwrap();
        assert_eq!(artifact.schema.table_name.as_str(), "Users");
        assert_eq!(artifact.records.len(), 2);
        assert_eq!(artifact.metadata_str("exportDate"), Some("2025-01-01T00:00:00Z"));
    }

    #[test_case("metadata" ; "missing metadata")]
    #[test_case("schema" ; "missing schema")]
    #[test_case("records" ; "missing records")]
    fn test_missing_section_is_named(section: &str) {
        let mut document = users_document();
        document.as_object_mut().unwrap().remove(section);

        let err = validate_sections(&document).unwrap_err();
        assert!(message(err).contains(&format!("section '{section}'")));
    }

    #[test]
    fn test_null_section_is_missing() {
        let mut document = users_document();
        document["schema"] = Value::Null;
        let err = validate_sections(&document).unwrap_err();
        assert!(message(err).contains("section 'schema' is missing or null"));
    }

    #[test]
    fn test_first_missing_section_wins() {
        let err = validate_sections(&json!({"records": []})).unwrap_err();
        assert!(message(err).contains("section 'metadata'"));
    }

    #[test]
    fn test_non_object_document_rejected() {
        let err = validate_sections(&json!([1, 2])).unwrap_err();
        assert!(message(err).contains("JSON object"));
    }

    #[test]
    fn test_empty_records_are_allowed() {
        let mut document = users_document();
        document["records"] = json!([]);
        assert!(decode_artifact(document).unwrap().records.is_empty());
    }

    #[test]
    fn test_records_must_be_objects() {
        let mut document = users_document();
        document["records"] = json!([{"id": "a"}, "oops"]);
        let err = decode_artifact(document).unwrap_err();
        assert!(message(err).contains("item 1 is not an object (found string)"));
    }

    #[test]
    fn test_records_must_be_an_array() {
        let mut document = users_document();
        document["records"] = json!({"id": "a"});
        let err = decode_artifact(document).unwrap_err();
        assert!(message(err).contains("section 'records' must be an array"));
    }

    #[test]
    fn test_undecodable_schema() {
        let mut document = users_document();
        document["schema"] = json!({"TableName": "Users"});
        let err = decode_artifact(document).unwrap_err();
        assert!(message(err).contains("section 'schema' cannot be decoded"));
    }

    #[test]
    fn test_schema_requires_partition_key() {
        let mut document = users_document();
        document["schema"]["KeySchema"] = json!([{"AttributeName": "id", "KeyType": "RANGE"}]);
        let err = decode_artifact(document).unwrap_err();
        assert!(message(err).contains("expected exactly one HASH key, found 0"));
    }

    #[test]
    fn test_schema_requires_attribute_definitions_for_keys() {
        let mut document = users_document();
        document["schema"]["AttributeDefinitions"] = json!([]);
        let err = decode_artifact(document).unwrap_err();
        assert!(message(err).contains("attribute 'id'"));
    }

    #[test]
    fn test_local_index_must_share_partition_key() {
        let mut document = users_document();
        document["schema"] = json!({
            "TableName": "Users",
            "KeySchema": [
                {"AttributeName": "id", "KeyType": "HASH"},
                {"AttributeName": "createdAt", "KeyType": "RANGE"}
            ],
            "AttributeDefinitions": [
                {"AttributeName": "id", "AttributeType": "S"},
                {"AttributeName": "createdAt", "AttributeType": "N"},
                {"AttributeName": "email", "AttributeType": "S"}
            ],
            "LocalSecondaryIndexes": [{
                "IndexName": "by-email",
                "KeySchema": [
                    {"AttributeName": "email", "KeyType": "HASH"},
                    {"AttributeName": "createdAt", "KeyType": "RANGE"}
                ],
                "Projection": {"ProjectionType": "ALL"}
            }]
        });
        let err = decode_artifact(document).unwrap_err();
        assert!(message(err).contains("must use the table partition key"));
    }

    #[test]
    fn test_duplicate_index_names_rejected() {
        let mut document = users_document();
        let index = json!({
            "IndexName": "id-index",
            "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
            "Projection": {"ProjectionType": "KEYS_ONLY"}
        });
        document["schema"]["GlobalSecondaryIndexes"] = json!([index.clone(), index]);
        let err = decode_artifact(document).unwrap_err();
        assert!(message(err).contains("duplicate index name 'id-index'"));
    }
}
