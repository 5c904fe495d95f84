//! API response types

use serde_json::Value;

use crate::document::DocumentError;

/// Failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub kind: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn from_error(err: &DocumentError) -> Self {
        Self {
            status: err.status_code(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Unified response type
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Read result
    Json(Value),
    /// Successful mutation
    Empty,
    Error(ErrorResponse),
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Json(data)
    }

    pub fn ok() -> Self {
        Response::Empty
    }

    pub fn error(err: &DocumentError) -> Self {
        Response::Error(ErrorResponse::from_error(err))
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        match self {
            Response::Json(_) | Response::Empty => 200,
            Response::Error(e) => e.status,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Response::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_responses() {
        assert_eq!(Response::success(json!({"a": 1})).status(), 200);
        assert_eq!(Response::ok().status(), 200);
        assert!(Response::ok().is_success());
    }

    #[test]
    fn test_error_response() {
        let resp = Response::error(&DocumentError::NodeNotFound("innerNode31".into()));
        assert_eq!(resp.status(), 404);
        match resp {
            Response::Error(e) => {
                assert_eq!(e.kind, "NODE_NOT_FOUND");
                assert!(e.message.contains("innerNode31"));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
