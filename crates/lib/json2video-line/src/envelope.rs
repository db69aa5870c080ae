use json2video_core::DispatchError;
use serde::Serialize;
use serde_json::{Value, json};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const SERVER_ERROR: i64 = -32000;

const JSONRPC_VERSION: &str = "2.0";

/// One JSON-RPC response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<DispatchError> for RpcError {
    fn from(err: DispatchError) -> Self {
        let code = match &err {
            DispatchError::InvalidOperation(_) => METHOD_NOT_FOUND,
            DispatchError::MissingCredential | DispatchError::MissingArgument { .. } => {
                INVALID_PARAMS
            }
            DispatchError::Upstream(_) | DispatchError::NotFound { .. } => SERVER_ERROR,
        };
        let data = err.upstream_payload().map_or_else(
            || json!({ "kind": err.kind() }),
            |payload| json!({ "kind": err.kind(), "payload": payload }),
        );
        Self {
            code,
            message: err.to_string(),
            data: Some(data),
        }
    }
}

impl RpcResponse {
    #[must_use]
    pub const fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    #[must_use]
    pub const fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Serializes the response as a single line without the trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            let fallback = Self::failure(
                self.id.clone(),
                RpcError::new(SERVER_ERROR, format!("failed to encode response: {err}")),
            );
            serde_json::to_string(&fallback).unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use json2video_core::{Operation, UpstreamError};

    use super::*;

    #[test]
    fn success_omits_error_member() {
        let line = RpcResponse::success(json!(7), json!("ok")).to_line();
        assert_eq!(line, r#"{"jsonrpc":"2.0","id":7,"result":"ok"}"#);
    }

    #[test]
    fn failure_keeps_null_id() {
        let line = RpcResponse::failure(Value::Null, RpcError::new(PARSE_ERROR, "bad json")).to_line();
        assert_eq!(
            line,
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"bad json"}}"#
        );
    }

    #[test]
    fn dispatch_errors_map_to_codes() {
        let not_found = RpcError::from(DispatchError::NotFound {
            operation: Operation::GetTemplate,
            name: "promo".into(),
        });
        assert_eq!(not_found.code, SERVER_ERROR);
        assert_eq!(not_found.data, Some(json!({ "kind": "not_found" })));

        let invalid = RpcError::from(DispatchError::InvalidOperation("x".into()));
        assert_eq!(invalid.code, METHOD_NOT_FOUND);

        let payload = json!({ "success": false });
        let upstream = RpcError::from(DispatchError::from(UpstreamError::rejected(payload.clone())));
        assert_eq!(
            upstream.data,
            Some(json!({ "kind": "upstream_error", "payload": payload }))
        );
    }
}
