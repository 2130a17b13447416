//! Export file validation tests against the public decoding entry points

use harbor::core::snapshot::{decode_artifact, parse_candidate, validate_sections};
use harbor::domain::HarborError;
use serde_json::{json, Value};
use test_case::test_case;

fn users_export() -> Value {
    json!({
        "metadata": {"exportDate": "2025-03-01T12:00:00Z", "itemCount": 3},
        "schema": {
            "TableName": "Users",
            "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
            "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}],
            "BillingModeSummary": {"BillingMode": "PAY_PER_REQUEST"}
        },
        "records": [
            {"id": "u1", "name": "Ada"},
            {"id": "u2", "name": "Grace", "tags": ["admin"]},
            {"id": "u3", "age": 41}
        ]
    })
}

fn malformed_message(result: harbor::domain::Result<impl std::fmt::Debug>) -> String {
    match result {
        Err(HarborError::MalformedExport(message)) => message,
        other => panic!("expected MalformedExport, got {other:?}"),
    }
}

#[test]
fn test_valid_export_decodes() {
    let artifact = decode_artifact(users_export()).unwrap();

    assert_eq!(artifact.schema.table_name.as_str(), "Users");
    assert_eq!(artifact.record_count(), 3);
    assert_eq!(artifact.records[1]["tags"], json!(["admin"]));
    assert_eq!(artifact.metadata_str("exportDate"), Some("2025-03-01T12:00:00Z"));
}

#[test_case("metadata" ; "metadata missing")]
#[test_case("schema" ; "schema missing")]
#[test_case("records" ; "records missing")]
fn test_missing_section_is_named(section: &str) {
    let mut document = users_export();
    document.as_object_mut().unwrap().remove(section);

    let message = malformed_message(validate_sections(&document));
    assert!(message.contains(section), "{message}");
}

#[test_case("metadata" ; "metadata null")]
#[test_case("schema" ; "schema null")]
#[test_case("records" ; "records null")]
fn test_null_section_is_named(section: &str) {
    let mut document = users_export();
    document[section] = Value::Null;

    let message = malformed_message(decode_artifact(document));
    assert!(message.contains(section), "{message}");
}

#[test]
fn test_first_missing_section_wins() {
    let message = malformed_message(validate_sections(&json!({"records": []})));
    assert!(message.contains("metadata"), "{message}");
}

#[test_case(json!([]) ; "array document")]
#[test_case(json!("export") ; "string document")]
#[test_case(json!(null) ; "null document")]
fn test_non_object_document_is_rejected(document: Value) {
    assert!(matches!(
        validate_sections(&document),
        Err(HarborError::MalformedExport(_))
    ));
}

#[test_case(json!({"id": "u1"}) ; "records object")]
#[test_case(json!([{"id": "u1"}, 7]) ; "record not an object")]
fn test_bad_records_are_rejected(records: Value) {
    let mut document = users_export();
    document["records"] = records;

    let message = malformed_message(decode_artifact(document));
    assert!(message.contains("records"), "{message}");
}

#[test_case(json!([]) ; "no key")]
#[test_case(json!([
    {"AttributeName": "id", "KeyType": "HASH"},
    {"AttributeName": "other", "KeyType": "HASH"}
]) ; "two partition keys")]
#[test_case(json!([{"AttributeName": "email", "KeyType": "HASH"}]) ; "undefined key attribute")]
fn test_invalid_key_schema_is_rejected(key_schema: Value) {
    let mut document = users_export();
    document["schema"]["KeySchema"] = key_schema;

    let message = malformed_message(decode_artifact(document));
    assert!(message.contains("schema"), "{message}");
}

#[test]
fn test_local_index_without_sort_key_is_rejected() {
    let mut document = users_export();
    document["schema"]["LocalSecondaryIndexes"] = json!([{
        "IndexName": "by-id",
        "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
        "Projection": {"ProjectionType": "ALL"}
    }]);

    let message = malformed_message(decode_artifact(document));
    assert!(message.contains("by-id"), "{message}");
}

#[test]
fn test_empty_records_are_valid() {
    let mut document = users_export();
    document["records"] = json!([]);

    let artifact = decode_artifact(document).unwrap();
    assert_eq!(artifact.record_count(), 0);
}

#[test_case(&b""[..] ; "empty body")]
#[test_case(&b"{\"metadata\": "[..] ; "truncated json")]
#[test_case(&b"not json at all"[..] ; "plain text")]
fn test_unparseable_body_is_rejected(bytes: &[u8]) {
    assert!(matches!(
        parse_candidate(bytes),
        Err(HarborError::MalformedExport(_))
    ));
}
