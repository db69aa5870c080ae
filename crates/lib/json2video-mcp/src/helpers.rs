use std::borrow::Cow;

use json2video_core::DispatchError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;
use serde_json::json;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn map_err(err: DispatchError) -> ErrorData {
    let code = match &err {
        DispatchError::InvalidOperation(_) => ErrorCode::METHOD_NOT_FOUND,
        DispatchError::MissingCredential | DispatchError::MissingArgument { .. } => {
            ErrorCode::INVALID_PARAMS
        }
        DispatchError::NotFound { .. } => ErrorCode::RESOURCE_NOT_FOUND,
        DispatchError::Upstream(_) => ErrorCode::INTERNAL_ERROR,
    };
    let data = err.upstream_payload().map_or_else(
        || json!({ "kind": err.kind() }),
        |payload| json!({ "kind": err.kind(), "payload": payload }),
    );
    ErrorData {
        data: Some(data),
        ..mcp_err(code, err.to_string())
    }
}
