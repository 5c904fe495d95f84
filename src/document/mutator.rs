//! Tree mutation engine
//!
//! Applies a read, write (create-or-update) or delete to a loaded JSON value
//! along a [`JsonPath`]. This is a plain synchronous computation over an
//! in-memory value: no I/O, no suspension points.
//!
//! Segment interpretation depends on the node being visited: against an
//! array a segment must parse as a non-negative index, against an object it
//! is used verbatim as a key. Writes create missing intermediate objects and
//! replace scalars found on the way with objects; reads and deletes never
//! modify the value when they fail.

use std::fmt;

use serde_json::{Map, Value};

use crate::observability::Logger;

use super::errors::{DocumentError, DocumentResult};
use super::path::JsonPath;

/// Operation applied at the end of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    /// Create or update; POST and PUT both map here
    Write,
    Delete,
}

impl Operation {
    /// Map an HTTP method name to an operation
    pub fn from_method(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(Operation::Read),
            "POST" | "PUT" => Some(Operation::Write),
            "DELETE" => Some(Operation::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "READ",
            Operation::Write => "WRITE",
            Operation::Delete => "DELETE",
        }
    }

    /// True for operations that change the document
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Operation::Read)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Value found at the path
    Read(Value),
    /// The path now holds (or has absorbed) the written value
    Written,
    /// The removed value
    Deleted(Value),
}

/// Apply `operation` to `root` at `path`.
///
/// `value` is required for [`Operation::Write`] and ignored otherwise.
/// An empty path is only valid for reads; whole-document replacement is the
/// caller's job.
pub fn apply(
    root: &mut Value,
    path: &JsonPath,
    operation: Operation,
    value: Option<Value>,
) -> DocumentResult<Applied> {
    match operation {
        Operation::Read => read(root, path).map(|found| Applied::Read(found.clone())),
        Operation::Write => {
            let value = value.ok_or_else(|| {
                DocumentError::InvalidRequestBody("a value is required to write".into())
            })?;
            write(root, path, value).map(|()| Applied::Written)
        }
        Operation::Delete => delete(root, path).map(Applied::Deleted),
    }
}

/// Borrow the node at `path`.
pub fn read<'a>(root: &'a Value, path: &JsonPath) -> DocumentResult<&'a Value> {
    path.iter().try_fold(root, |current, segment| descend(current, segment))
}

/// Create or update the node at `path`.
///
/// Missing intermediate nodes become empty objects, and a scalar met before
/// the last segment is replaced by an object. At the last segment:
/// - missing key: inserted
/// - object field holding an array: `value` is appended to that array
/// - array element that is itself an array: the element is removed and
///   `value` is inserted at the front of the enclosing array
/// - anything else: overwritten
pub fn write(root: &mut Value, path: &JsonPath, value: Value) -> DocumentResult<()> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(DocumentError::RootMutationForbidden(Operation::Write));
    };

    let mut current = root;
    for segment in parents {
        current = descend_or_create(current, segment)?;
    }

    write_leaf(current, last, value)
}

/// Remove the node at `path` and return it.
pub fn delete(root: &mut Value, path: &JsonPath) -> DocumentResult<Value> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(DocumentError::RootMutationForbidden(Operation::Delete));
    };

    let mut current = root;
    for segment in parents {
        current = descend_mut(current, segment)?;
    }

    match current {
        Value::Array(items) => {
            let index = parse_index(last)?;
            if index >= items.len() {
                return Err(DocumentError::IndexNotFound {
                    index,
                    len: items.len(),
                });
            }
            Ok(items.remove(index))
        }
        Value::Object(map) => map
            .shift_remove(last.as_str())
            .ok_or_else(|| DocumentError::NodeNotFound(last.clone())),
        _ => Err(DocumentError::NodeNotFound(last.clone())),
    }
}

/// Array nodes only accept non-negative integer segments.
fn parse_index(segment: &str) -> DocumentResult<usize> {
    segment.parse::<usize>().map_err(|_| {
        Logger::warn("NODE_NOT_FOUND", &[("key", segment), ("reason", "non-numeric key on list")]);
        DocumentError::NodeNotFound(segment.to_string())
    })
}

fn descend<'a>(current: &'a Value, segment: &str) -> DocumentResult<&'a Value> {
    match current {
        Value::Array(items) => {
            let index = parse_index(segment)?;
            items.get(index).ok_or(DocumentError::IndexNotFound {
                index,
                len: items.len(),
            })
        }
        Value::Object(map) => map
            .get(segment)
            .ok_or_else(|| DocumentError::NodeNotFound(segment.to_string())),
        _ => Err(DocumentError::NodeNotFound(segment.to_string())),
    }
}

fn descend_mut<'a>(current: &'a mut Value, segment: &str) -> DocumentResult<&'a mut Value> {
    match current {
        Value::Array(items) => {
            let index = parse_index(segment)?;
            let len = items.len();
            items
                .get_mut(index)
                .ok_or(DocumentError::IndexNotFound { index, len })
        }
        Value::Object(map) => map
            .get_mut(segment)
            .ok_or_else(|| DocumentError::NodeNotFound(segment.to_string())),
        _ => Err(DocumentError::NodeNotFound(segment.to_string())),
    }
}

fn descend_or_create<'a>(current: &'a mut Value, segment: &str) -> DocumentResult<&'a mut Value> {
    match current {
        Value::Array(items) => {
            let index = parse_index(segment)?;
            let len = items.len();
            items
                .get_mut(index)
                .ok_or(DocumentError::IndexNotFound { index, len })
        }
        Value::Object(map) => Ok(map
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()))),
        scalar => {
            Logger::debug("SCALAR_REPLACED_BY_OBJECT", &[("key", segment)]);
            *scalar = Value::Object(Map::new());
            descend_or_create(scalar, segment)
        }
    }
}

fn write_leaf(current: &mut Value, segment: &str, value: Value) -> DocumentResult<()> {
    match current {
        Value::Array(items) => {
            let index = parse_index(segment)?;
            if index >= items.len() {
                return Err(DocumentError::IndexNotFound {
                    index,
                    len: items.len(),
                });
            }
            if items[index].is_array() {
                Logger::debug("LIST_INDEX_REPLACED", &[("index", segment)]);
                items.remove(index);
                items.insert(0, value);
            } else {
                items[index] = value;
            }
        }
        Value::Object(map) => match map.get_mut(segment) {
            Some(Value::Array(list)) => {
                Logger::debug("LIST_APPENDED", &[("key", segment)]);
                list.push(value);
            }
            Some(slot) => *slot = value,
            None => {
                map.insert(segment.to_string(), value);
            }
        },
        scalar => {
            Logger::debug("SCALAR_REPLACED_BY_OBJECT", &[("key", segment)]);
            let mut map = Map::new();
            map.insert(segment.to_string(), value);
            *scalar = Value::Object(map);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> JsonPath {
        JsonPath::parse(raw).unwrap()
    }

    fn example() -> Value {
        json!({
            "node1": {},
            "node2": { "list": [1, 2] },
            "node3": { "innerNode31": "v" }
        })
    }

    #[test]
    fn test_operation_from_method() {
        assert_eq!(Operation::from_method("GET"), Some(Operation::Read));
        assert_eq!(Operation::from_method("post"), Some(Operation::Write));
        assert_eq!(Operation::from_method("PUT"), Some(Operation::Write));
        assert_eq!(Operation::from_method("DELETE"), Some(Operation::Delete));
        assert_eq!(Operation::from_method("PATCH"), None);
    }

    #[test]
    fn test_only_read_is_not_a_mutation() {
        assert!(!Operation::Read.is_mutation());
        assert!(Operation::Write.is_mutation());
        assert!(Operation::Delete.is_mutation());
    }

    #[test]
    fn test_read_root_returns_document() {
        let mut doc = example();
        let applied = apply(&mut doc, &JsonPath::root(), Operation::Read, None).unwrap();
        assert_eq!(applied, Applied::Read(example()));
    }

    #[test]
    fn test_root_mutations_forbidden() {
        let mut doc = example();
        assert_eq!(
            apply(&mut doc, &JsonPath::root(), Operation::Delete, None),
            Err(DocumentError::RootMutationForbidden(Operation::Delete))
        );
        assert_eq!(
            apply(&mut doc, &JsonPath::root(), Operation::Write, Some(json!(1))),
            Err(DocumentError::RootMutationForbidden(Operation::Write))
        );
        assert_eq!(doc, example());
    }

    #[test]
    fn test_read_nested_and_indexed() {
        let doc = example();
        assert_eq!(read(&doc, &path("node3/innerNode31")).unwrap(), &json!("v"));
        assert_eq!(read(&doc, &path("node2/list/1")).unwrap(), &json!(2));
    }

    #[test]
    fn test_read_missing_key() {
        let doc = example();
        assert_eq!(
            read(&doc, &path("test/nonexistent_node")),
            Err(DocumentError::NodeNotFound("test".into()))
        );
    }

    #[test]
    fn test_read_through_scalar_fails() {
        let doc = example();
        assert_eq!(
            read(&doc, &path("node3/innerNode31/deeper")),
            Err(DocumentError::NodeNotFound("deeper".into()))
        );
    }

    #[test]
    fn test_read_index_out_of_range() {
        let doc = example();
        assert_eq!(
            read(&doc, &path("node2/list/100")),
            Err(DocumentError::IndexNotFound { index: 100, len: 2 })
        );
    }

    #[test]
    fn test_non_numeric_key_on_array_fails_for_every_operation() {
        let mut doc = example();
        let key = DocumentError::NodeNotFound("first".into());
        assert_eq!(read(&doc, &path("node2/list/first")), Err(key.clone()));
        assert_eq!(delete(&mut doc, &path("node2/list/first")), Err(key.clone()));
        assert_eq!(
            write(&mut doc, &path("node2/list/first"), json!(0)),
            Err(key.clone())
        );
        assert_eq!(write(&mut doc, &path("node2/list/-1"), json!(0)), Err(
            DocumentError::NodeNotFound("-1".into())
        ));
        assert_eq!(doc, example());
    }

    #[test]
    fn test_write_new_key_in_existing_node() {
        let mut doc = example();
        write(&mut doc, &path("node1/test"), json!({"data": 0})).unwrap();
        assert_eq!(read(&doc, &path("node1/test")).unwrap(), &json!({"data": 0}));
    }

    #[test]
    fn test_write_autovivifies_intermediate_objects() {
        let mut doc = json!({});
        write(&mut doc, &path("a/b/c"), json!(7)).unwrap();
        assert_eq!(doc, json!({"a": {"b": {"c": 7}}}));
    }

    #[test]
    fn test_write_appends_to_list_field() {
        let mut doc = example();
        write(&mut doc, &path("node2/list"), json!({"data": 0})).unwrap();
        assert_eq!(
            read(&doc, &path("node2/list")).unwrap(),
            &json!([1, 2, {"data": 0}])
        );
    }

    #[test]
    fn test_write_scalar_element_replaced_in_place() {
        let mut doc = example();
        write(&mut doc, &path("node2/list/1"), json!({"data": 0})).unwrap();
        assert_eq!(
            read(&doc, &path("node2/list")).unwrap(),
            &json!([1, {"data": 0}])
        );
    }

    #[test]
    fn test_write_nested_list_element_moves_to_front() {
        let mut doc = json!({"matrix": [[1], [2], [3]]});
        write(&mut doc, &path("matrix/2"), json!("x")).unwrap();
        assert_eq!(doc, json!({"matrix": ["x", [1], [2]]}));
    }

    #[test]
    fn test_write_index_out_of_range() {
        let mut doc = example();
        assert_eq!(
            write(&mut doc, &path("node2/list/5"), json!(0)),
            Err(DocumentError::IndexNotFound { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_write_overwrites_existing_scalar() {
        let mut doc = example();
        write(&mut doc, &path("node3/innerNode31"), json!("new_node3_value")).unwrap();
        assert_eq!(
            read(&doc, &path("node3/innerNode31")).unwrap(),
            &json!("new_node3_value")
        );
    }

    #[test]
    fn test_write_through_scalar_prefix_converts_to_objects() {
        let mut doc = example();
        write(&mut doc, &path("node3/innerNode31/a/b"), json!(true)).unwrap();
        assert_eq!(
            read(&doc, &path("node3/innerNode31")).unwrap(),
            &json!({"a": {"b": true}})
        );
    }

    #[test]
    fn test_write_on_scalar_root_converts_root() {
        let mut doc = json!(0);
        write(&mut doc, &path("file/value/content"), json!({"data": 0})).unwrap();
        assert_eq!(doc, json!({"file": {"value": {"content": {"data": 0}}}}));
    }

    #[test]
    fn test_write_into_array_root_by_index() {
        let mut doc = json!([{"a": 1}, {"a": 2}]);
        write(&mut doc, &path("1/a"), json!(3)).unwrap();
        assert_eq!(doc, json!([{"a": 1}, {"a": 3}]));
    }

    #[test]
    fn test_write_requires_value() {
        let mut doc = example();
        assert!(matches!(
            apply(&mut doc, &path("node1/x"), Operation::Write, None),
            Err(DocumentError::InvalidRequestBody(_))
        ));
    }

    #[test]
    fn test_delete_then_read_fails() {
        let mut doc = example();
        let removed = delete(&mut doc, &path("node3/innerNode31")).unwrap();
        assert_eq!(removed, json!("v"));
        assert_eq!(
            read(&doc, &path("node3/innerNode31")),
            Err(DocumentError::NodeNotFound("innerNode31".into()))
        );
    }

    #[test]
    fn test_delete_list_element() {
        let mut doc = example();
        delete(&mut doc, &path("node2/list/0")).unwrap();
        assert_eq!(read(&doc, &path("node2/list")).unwrap(), &json!([2]));
    }

    #[test]
    fn test_delete_keeps_sibling_order() {
        let mut doc = example();
        delete(&mut doc, &path("node1")).unwrap();
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["node2", "node3"]);
    }

    #[test]
    fn test_delete_missing_leaves_document_untouched() {
        let mut doc = example();
        assert_eq!(
            delete(&mut doc, &path("node1/innerNode11")),
            Err(DocumentError::NodeNotFound("innerNode11".into()))
        );
        assert_eq!(
            delete(&mut doc, &path("node2/list/9")),
            Err(DocumentError::IndexNotFound { index: 9, len: 2 })
        );
        assert_eq!(doc, example());
    }

    #[test]
    fn test_delete_below_scalar_root_fails() {
        let mut doc = json!(0);
        assert_eq!(
            delete(&mut doc, &path("file/value/content")),
            Err(DocumentError::NodeNotFound("file".into()))
        );
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let mut doc = example();
        for (raw, value) in [
            ("node3/innerNode31", json!(42)),
            ("node1/flag", json!(false)),
            ("node2/list/0", json!("first")),
        ] {
            write(&mut doc, &path(raw), value.clone()).unwrap();
            assert_eq!(read(&doc, &path(raw)).unwrap(), &value);
        }
    }
}
