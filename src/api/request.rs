//! API request types
//!
//! A request is what remains of an HTTP call once the transport has decoded
//! it: an operation, the raw URL path and the raw body.

use serde_json::Value;

use crate::document::{DocumentError, DocumentResult, Operation};

/// Transport-neutral document request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub operation: Operation,
    /// URL path, `/` separated, as received
    pub path: String,
    /// Raw body, only meaningful for writes
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(operation: Operation, path: impl Into<String>, body: Option<Vec<u8>>) -> Self {
        Self {
            operation,
            path: path.into(),
            body,
        }
    }

    /// Build a request from an HTTP method name; `None` for unsupported methods.
    pub fn from_method(method: &str, path: impl Into<String>, body: Option<Vec<u8>>) -> Option<Self> {
        Operation::from_method(method).map(|operation| Self::new(operation, path, body))
    }

    pub fn read(path: impl Into<String>) -> Self {
        Self::new(Operation::Read, path, None)
    }

    pub fn write(path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(Operation::Write, path, Some(body.into()))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Operation::Delete, path, None)
    }

    /// Parse the body as JSON, whatever content type it was sent with.
    pub fn json_body(&self) -> DocumentResult<Value> {
        let body = self
            .body
            .as_deref()
            .filter(|b| !b.iter().all(u8::is_ascii_whitespace))
            .ok_or_else(|| DocumentError::InvalidRequestBody("request body is empty".into()))?;

        serde_json::from_slice(body).map_err(|e| DocumentError::InvalidRequestBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_methods_map_to_operations() {
        assert_eq!(Request::from_method("GET", "/", None).unwrap().operation, Operation::Read);
        assert_eq!(Request::from_method("post", "/", None).unwrap().operation, Operation::Write);
        assert_eq!(Request::from_method("PUT", "/", None).unwrap().operation, Operation::Write);
        assert_eq!(
            Request::from_method("DELETE", "/", None).unwrap().operation,
            Operation::Delete
        );
        assert!(Request::from_method("PATCH", "/", None).is_none());
    }

    #[test]
    fn test_json_body() {
        let request = Request::write("/node1", r#"{"data": 0}"#);
        assert_eq!(request.json_body().unwrap(), json!({"data": 0}));

        let request = Request::write("/node1", "17");
        assert_eq!(request.json_body().unwrap(), json!(17));
    }

    #[test]
    fn test_missing_or_invalid_body() {
        assert!(matches!(
            Request::read("/").json_body(),
            Err(DocumentError::InvalidRequestBody(_))
        ));
        assert!(matches!(
            Request::write("/", "  \n").json_body(),
            Err(DocumentError::InvalidRequestBody(_))
        ));
        assert!(matches!(
            Request::write("/", "{bad").json_body(),
            Err(DocumentError::InvalidRequestBody(_))
        ));
    }
}
