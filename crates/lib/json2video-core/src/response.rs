use serde_json::Value;

use crate::error::UpstreamError;

/// Successful result of an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Human-readable confirmation.
    Text(String),
    /// Upstream document, passed through unmodified.
    Document(Value),
}

impl ToolOutput {
    /// Renders the output as a text block; documents are pretty-printed.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Document(document) => {
                serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string())
            }
        }
    }

    /// Renders the output as a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Text(text) => Value::String(text),
            Self::Document(document) => document,
        }
    }
}

/// Accepts an upstream response only when it carries `"success": true`.
///
/// # Errors
/// Returns the whole payload inside an `UpstreamError` otherwise.
pub fn ensure_success(payload: Value) -> Result<Value, UpstreamError> {
    if payload.get("success").and_then(Value::as_bool) == Some(true) {
        Ok(payload)
    } else {
        Err(UpstreamError::rejected(payload))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_flag_must_be_boolean_true() {
        assert!(ensure_success(json!({ "success": true })).is_ok());
        for payload in [
            json!({ "success": false, "message": "not found" }),
            json!({ "success": "true" }),
            json!({ "project": "abc" }),
            json!([]),
        ] {
            let err = ensure_success(payload.clone()).expect_err("payload should be rejected");
            assert_eq!(err.payload(), Some(&payload));
        }
    }

    #[test]
    fn documents_render_pretty() {
        let output = ToolOutput::Document(json!({ "a": 1 }));
        assert_eq!(output.to_text(), "{\n  \"a\": 1\n}");
        assert_eq!(ToolOutput::Text("done".into()).into_value(), json!("done"));
    }
}
