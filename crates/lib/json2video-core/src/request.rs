use serde_json::{Map, Value};

use crate::error::DispatchError;
use crate::operation::Operation;

pub type JsonObject = Map<String, Value>;

/// Argument key carrying a per-request API key.
pub const API_KEY_ARG: &str = "apiKey";

/// A validated request for one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    /// `movie` is the render-job body sent upstream as-is.
    GenerateVideo { movie: JsonObject },
    GetVideoStatus { project: String },
    CreateTemplate {
        name: String,
        description: Option<String>,
    },
    GetTemplate { name: String },
    ListTemplates,
}

impl ToolRequest {
    /// Builds a request from loose JSON arguments.
    ///
    /// # Errors
    /// Returns `MissingArgument` when a required field is absent or blank.
    pub fn from_arguments(
        operation: Operation,
        arguments: &JsonObject,
    ) -> Result<Self, DispatchError> {
        let request = match operation {
            Operation::GenerateVideo => {
                let mut movie = arguments.clone();
                movie.remove(API_KEY_ARG);
                Self::GenerateVideo { movie }
            }
            Operation::GetVideoStatus => Self::GetVideoStatus {
                project: string_arg(arguments, "project").unwrap_or_default(),
            },
            Operation::CreateTemplate => Self::CreateTemplate {
                name: string_arg(arguments, "name").unwrap_or_default(),
                description: string_arg(arguments, "description"),
            },
            Operation::GetTemplate => Self::GetTemplate {
                name: string_arg(arguments, "name").unwrap_or_default(),
            },
            Operation::ListTemplates => Self::ListTemplates,
        };
        request.validate()?;
        Ok(request)
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::GenerateVideo { .. } => Operation::GenerateVideo,
            Self::GetVideoStatus { .. } => Operation::GetVideoStatus,
            Self::CreateTemplate { .. } => Operation::CreateTemplate,
            Self::GetTemplate { .. } => Operation::GetTemplate,
            Self::ListTemplates => Operation::ListTemplates,
        }
    }

    /// Checks the required fields of an already-typed request.
    ///
    /// # Errors
    /// Returns `MissingArgument` naming the first absent field.
    pub fn validate(&self) -> Result<(), DispatchError> {
        let missing = |field| DispatchError::MissingArgument {
            operation: self.operation(),
            field,
        };
        match self {
            Self::GenerateVideo { movie } => {
                if !movie.get("scenes").is_some_and(is_non_empty) {
                    return Err(missing("scenes"));
                }
            }
            Self::GetVideoStatus { project } => {
                if project.trim().is_empty() {
                    return Err(missing("project"));
                }
            }
            Self::CreateTemplate { name, .. } | Self::GetTemplate { name } => {
                if name.trim().is_empty() {
                    return Err(missing("name"));
                }
            }
            Self::ListTemplates => {}
        }
        Ok(())
    }

    /// Arguments as they should appear in diagnostics.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::GenerateVideo { movie } => {
                let scenes = match movie.get("scenes") {
                    Some(Value::Array(scenes)) => scenes.len(),
                    Some(Value::Object(scenes)) => scenes.len(),
                    _ => 0,
                };
                let keys: Vec<&str> = movie.keys().map(String::as_str).collect();
                format!("scenes={scenes} fields=[{}]", keys.join(","))
            }
            Self::GetVideoStatus { project } => format!("project={project}"),
            Self::CreateTemplate { name, description } => format!(
                "name={name} description={}",
                description.as_deref().unwrap_or("<default>")
            ),
            Self::GetTemplate { name } => format!("name={name}"),
            Self::ListTemplates => String::new(),
        }
    }
}

/// Reads an API key argument, treating blank strings as absent.
#[must_use]
pub fn api_key_arg(arguments: &JsonObject) -> Option<&str> {
    arguments
        .get(API_KEY_ARG)
        .and_then(Value::as_str)
        .filter(|key| !key.trim().is_empty())
}

fn string_arg(arguments: &JsonObject, field: &str) -> Option<String> {
    match arguments.get(field)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        _ => false,
    }
}
