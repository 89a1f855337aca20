//! JSON-RPC 2.0 envelope types for the aria2 wire protocol.
//!
//! Requests are sent as an HTTP POST body to `http://{host}:{port}/jsonrpc`:
//!
//! ```json
//! {"jsonrpc":"2.0","id":"<unique>","method":"aria2.getVersion","params":[]}
//! ```
//!
//! The response body carries either a `result` value or an `error` object,
//! never both. Each request/response pair lives for a single call; the id is
//! required by the wire format but no pending-call table is kept, since the
//! transport is strict one-shot request/response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const JSONRPC_VERSION: &str = "2.0";

/// Request envelope sent to the daemon.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    /// Fresh per call; never reused.
    pub id: String,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    /// Create a request envelope with a freshly generated id.
    ///
    /// `params` must already carry the secret token as element 0 when the
    /// daemon requires one; this layer does not know about authentication.
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: Uuid::new_v4().to_string(),
            method: method.into(),
            params,
        }
    }
}

/// Response envelope received from the daemon.
///
/// A well-formed response carries exactly one of `result` or `error`; the
/// client rejects bodies that carry neither.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcFailure>,
}

/// Method-level failure reported by the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcFailure {
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_as_jsonrpc_envelope() {
        let request = RpcRequest::new("aria2.getVersion", Vec::new());
        let serialized = serde_json::to_string(&request).unwrap();

        let parsed: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed["jsonrpc"], "2.0");
        assert_eq!(parsed["method"], "aria2.getVersion");
        assert_eq!(parsed["params"], json!([]));
        assert!(parsed["id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[test]
    fn request_ids_are_unique_per_call() {
        let a = RpcRequest::new("aria2.getVersion", Vec::new());
        let b = RpcRequest::new("aria2.getVersion", Vec::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn response_parses_result() {
        let body = r#"{"id":"1","jsonrpc":"2.0","result":{"version":"1.37.0"}}"#;
        let response: RpcResponse = serde_json::from_str(body).unwrap();
        assert!(response.result.is_some());
        assert!(response.error.is_none());
    }

    #[test]
    fn response_parses_error() {
        let body = r#"{"id":"1","jsonrpc":"2.0","error":{"code":1,"message":"Unauthorized"}}"#;
        let response: RpcResponse = serde_json::from_str(body).unwrap();
        assert!(response.result.is_none());
        let failure = response.error.unwrap();
        assert_eq!(failure.code, 1);
        assert_eq!(failure.message, "Unauthorized");
    }
}
