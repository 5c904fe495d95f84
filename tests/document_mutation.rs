//! Document Mutation Tests
//!
//! Tree mutation properties, exercised through the public library API:
//! - Write then read returns the written value
//! - Delete then read is NodeNotFound
//! - Writes create every missing intermediate object
//! - The root can be read but never written or deleted through the mutator
//! - Array indexes are bounds checked and must be numeric

use json_api::document::{mutator, Applied, DocumentError, JsonPath, Operation};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn example() -> Value {
    json!({
        "node1": {},
        "node2": {"list": [1, 2]},
        "node3": {"innerNode31": "v"}
    })
}

fn path(raw: &str) -> JsonPath {
    JsonPath::parse(raw).unwrap()
}

fn read(doc: &Value, raw: &str) -> Result<Value, DocumentError> {
    mutator::read(doc, &path(raw)).map(Value::clone)
}

// =============================================================================
// Round Trip Tests
// =============================================================================

/// Writing a scalar leaf then reading it returns the new value.
#[test]
fn test_write_then_read_scalar_leaf() {
    for value in [json!(0), json!("text"), json!(true), json!(null), json!(2.5)] {
        let mut doc = example();
        mutator::write(&mut doc, &path("node3/innerNode31"), value.clone()).unwrap();
        assert_eq!(read(&doc, "node3/innerNode31").unwrap(), value);
    }
}

/// Deleting an existing node makes it unreadable.
#[test]
fn test_delete_then_read_is_not_found() {
    for raw in ["node1", "node2/list", "node3/innerNode31", "node3"] {
        let mut doc = example();
        mutator::delete(&mut doc, &path(raw)).unwrap();
        assert!(
            read(&doc, raw).unwrap_err().is_not_found(),
            "{} still readable",
            raw
        );
    }
}

/// Writing a deep path on an empty document creates every level.
#[test]
fn test_write_auto_creates_intermediate_objects() {
    let mut doc = json!({});
    mutator::write(&mut doc, &path("a/b/c"), json!(7)).unwrap();
    assert_eq!(doc, json!({"a": {"b": {"c": 7}}}));
}

/// A scalar met on the way is replaced by an object.
#[test]
fn test_write_through_scalar_replaces_it() {
    let mut doc = example();
    mutator::write(&mut doc, &path("node3/innerNode31/deeper"), json!(1)).unwrap();
    assert_eq!(doc["node3"]["innerNode31"], json!({"deeper": 1}));
}

// =============================================================================
// Root Tests
// =============================================================================

/// Reading the root returns the whole document.
#[test]
fn test_read_root_returns_document() {
    let doc = example();
    assert_eq!(read(&doc, "/").unwrap(), doc);
}

/// Deleting or writing the root through the mutator is rejected and leaves
/// the document unchanged.
#[test]
fn test_root_mutation_forbidden() {
    for mut doc in [example(), json!(0), json!([1, 2]), json!(null)] {
        let before = doc.clone();

        let err = mutator::delete(&mut doc, &JsonPath::root()).unwrap_err();
        assert_eq!(err, DocumentError::RootMutationForbidden(Operation::Delete));

        let err = mutator::write(&mut doc, &JsonPath::root(), json!({})).unwrap_err();
        assert_eq!(err, DocumentError::RootMutationForbidden(Operation::Write));

        assert_eq!(doc, before);
    }
}

// =============================================================================
// Array Tests
// =============================================================================

/// Out-of-range indexes fail for every operation.
#[test]
fn test_array_index_out_of_range() {
    let mut doc = example();
    let expected = DocumentError::IndexNotFound { index: 5, len: 2 };

    assert_eq!(read(&doc, "node2/list/5").unwrap_err(), expected);
    assert_eq!(
        mutator::delete(&mut doc, &path("node2/list/5")).unwrap_err(),
        expected
    );
    assert_eq!(
        mutator::write(&mut doc, &path("node2/list/5"), json!(0)).unwrap_err(),
        expected
    );
    assert_eq!(doc, example());
}

/// Non-numeric segments against an array fail, even for writes.
#[test]
fn test_array_requires_numeric_segment() {
    let mut doc = example();
    for raw in ["node2/list/first", "node2/list/-1"] {
        assert!(matches!(read(&doc, raw), Err(DocumentError::NodeNotFound(_))));
        assert!(matches!(
            mutator::write(&mut doc, &path(raw), json!(0)),
            Err(DocumentError::NodeNotFound(_))
        ));
    }
    assert_eq!(doc, example());
}

/// Writing an array element that is not itself an array replaces it in place.
#[test]
fn test_write_list_element_in_place() {
    let mut doc = example();
    mutator::write(&mut doc, &path("node2/list/1"), json!("two")).unwrap();
    assert_eq!(doc["node2"]["list"], json!([1, "two"]));
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[test]
fn test_scenario_create_node() {
    let mut doc = example();
    let applied = mutator::apply(
        &mut doc,
        &path("node1/test"),
        Operation::Write,
        Some(json!({"data": 0})),
    )
    .unwrap();
    assert_eq!(applied, Applied::Written);
    assert_eq!(read(&doc, "node1/test").unwrap(), json!({"data": 0}));
}

#[test]
fn test_scenario_append_to_list_field() {
    let mut doc = example();
    mutator::write(&mut doc, &path("node2/list"), json!({"data": 0})).unwrap();
    assert_eq!(read(&doc, "node2/list").unwrap().as_array().unwrap().len(), 3);
}

#[test]
fn test_scenario_delete_leaf() {
    let mut doc = example();
    let applied = mutator::apply(&mut doc, &path("node3/innerNode31"), Operation::Delete, None)
        .unwrap();
    assert_eq!(applied, Applied::Deleted(json!("v")));
    assert!(matches!(
        read(&doc, "node3/innerNode31"),
        Err(DocumentError::NodeNotFound(_))
    ));
}

#[test]
fn test_scenario_delete_list_element() {
    let mut doc = example();
    mutator::delete(&mut doc, &path("node2/list/0")).unwrap();
    assert_eq!(read(&doc, "node2/list").unwrap(), json!([2]));
}

#[test]
fn test_scenario_read_via_apply() {
    let mut doc = example();
    let applied = mutator::apply(&mut doc, &path("node2/list/0"), Operation::Read, None).unwrap();
    assert_eq!(applied, Applied::Read(json!(1)));
}
