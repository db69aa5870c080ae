use std::{error::Error, fmt};

use serde_json::Value;

use crate::operation::Operation;

/// Failure talking to the json2video API, or a response it did not mark as successful.
#[derive(Debug, Clone)]
pub struct UpstreamError {
    message: String,
    payload: Option<Value>,
}

impl UpstreamError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
        }
    }

    /// Response body that could not be decoded as JSON.
    pub fn malformed(body: &str) -> Self {
        Self {
            message: "json2video API returned a non-JSON response".to_string(),
            payload: Some(Value::String(body.to_string())),
        }
    }

    #[must_use]
    pub fn rejected(payload: Value) -> Self {
        Self {
            message: format!("json2video API error: {payload}"),
            payload: Some(payload),
        }
    }

    /// Raw upstream payload, when one was received.
    pub const fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for UpstreamError {}

#[derive(Debug)]
pub enum DispatchError {
    InvalidOperation(String),
    MissingCredential,
    MissingArgument {
        operation: Operation,
        field: &'static str,
    },
    Upstream(UpstreamError),
    NotFound {
        operation: Operation,
        name: String,
    },
}

impl DispatchError {
    /// Stable, machine-readable kind used in protocol error envelopes.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidOperation(_) => "invalid_operation",
            Self::MissingCredential => "missing_credential",
            Self::MissingArgument { .. } => "missing_argument",
            Self::Upstream(_) => "upstream_error",
            Self::NotFound { .. } => "not_found",
        }
    }

    pub const fn upstream_payload(&self) -> Option<&Value> {
        match self {
            Self::Upstream(err) => err.payload(),
            _ => None,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOperation(name) => write!(f, "Unknown tool: {name}"),
            Self::MissingCredential => f.write_str(
                "API key is required (either in arguments or as environment variable JSON2VIDEO_API_KEY)",
            ),
            Self::MissingArgument { operation, field } => {
                write!(f, "{field} is required for {operation}")
            }
            Self::Upstream(err) => write!(f, "{err}"),
            Self::NotFound { name, .. } => write!(f, "template not found: {name}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Upstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UpstreamError> for DispatchError {
    fn from(err: UpstreamError) -> Self {
        Self::Upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rejected_error_carries_payload() {
        let payload = json!({ "success": false, "message": "not found" });
        let err = DispatchError::from(UpstreamError::rejected(payload.clone()));

        assert_eq!(err.kind(), "upstream_error");
        assert_eq!(err.upstream_payload(), Some(&payload));
        assert!(err.to_string().starts_with("json2video API error: "));
    }

    #[test]
    fn missing_argument_names_field_and_operation() {
        let err = DispatchError::MissingArgument {
            operation: Operation::GetTemplate,
            field: "name",
        };
        assert_eq!(err.kind(), "missing_argument");
        assert_eq!(err.to_string(), "name is required for get_template");
        assert!(err.upstream_payload().is_none());
    }
}
