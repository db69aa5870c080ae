use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::Json2VideoClient;
use crate::error::{DispatchError, UpstreamError};
use crate::operation::Operation;
use crate::request::{JsonObject, ToolRequest, api_key_arg};
use crate::response::{ToolOutput, ensure_success};

/// Routes tool requests to the json2video API and normalizes the results.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Json2VideoClient,
    default_api_key: Option<String>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(client: Json2VideoClient) -> Self {
        Self {
            client,
            default_api_key: None,
        }
    }

    /// Sets the process-wide key used when a request carries none.
    #[must_use]
    pub fn with_default_api_key(mut self, api_key: Option<String>) -> Self {
        self.default_api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Picks the explicit key when present, else the configured one.
    ///
    /// # Errors
    /// Returns `MissingCredential` when neither is available.
    pub fn resolve_api_key<'a>(
        &'a self,
        explicit: Option<&'a str>,
    ) -> Result<&'a str, DispatchError> {
        explicit
            .filter(|key| !key.trim().is_empty())
            .or(self.default_api_key.as_deref())
            .ok_or(DispatchError::MissingCredential)
    }

    /// Runs the operation named `operation` with loose JSON arguments.
    ///
    /// An explicit `api_key` wins over an `apiKey` argument.
    ///
    /// # Errors
    /// Returns the first validation failure, or the upstream failure.
    pub async fn handle(
        &self,
        operation: &str,
        arguments: JsonObject,
        api_key: Option<&str>,
    ) -> Result<ToolOutput, DispatchError> {
        let operation: Operation = operation.parse()?;
        let explicit = api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| api_key_arg(&arguments));
        let api_key = self.resolve_api_key(explicit)?;
        let request = ToolRequest::from_arguments(operation, &arguments)?;
        self.run(request, api_key).await
    }

    /// Runs an already-typed request.
    ///
    /// # Errors
    /// Returns `MissingCredential`, `MissingArgument`, or the upstream failure.
    pub async fn execute(
        &self,
        request: ToolRequest,
        api_key: Option<&str>,
    ) -> Result<ToolOutput, DispatchError> {
        let api_key = self.resolve_api_key(api_key)?;
        request.validate()?;
        self.run(request, api_key).await
    }

    async fn run(&self, request: ToolRequest, api_key: &str) -> Result<ToolOutput, DispatchError> {
        let operation = request.operation();
        info!(%operation, args = %request.summary(), "dispatching json2video call");

        let result = match request {
            ToolRequest::GenerateVideo { movie } => self.generate_video(api_key, &movie).await,
            ToolRequest::GetVideoStatus { project } => {
                self.get_video_status(api_key, &project).await
            }
            ToolRequest::CreateTemplate { name, description } => {
                self.create_template(api_key, &name, description).await
            }
            ToolRequest::GetTemplate { name } => self.get_template(api_key, &name).await,
            ToolRequest::ListTemplates => self.list_templates(api_key).await,
        };

        if let Err(err) = &result {
            warn!(%operation, kind = err.kind(), error = %err, "json2video call failed");
        }
        result
    }

    async fn generate_video(
        &self,
        api_key: &str,
        movie: &JsonObject,
    ) -> Result<ToolOutput, DispatchError> {
        let payload = ensure_success(self.client.create_movie(api_key, movie).await?)?;
        let Some(project) = payload.get("project").and_then(identifier) else {
            return Err(UpstreamError::rejected(payload).into());
        };
        Ok(ToolOutput::Text(format!(
            "Video generation started. Project ID: {project}"
        )))
    }

    async fn get_video_status(
        &self,
        api_key: &str,
        project: &str,
    ) -> Result<ToolOutput, DispatchError> {
        let payload = ensure_success(self.client.get_movie(api_key, project).await?)?;
        Ok(ToolOutput::Document(payload))
    }

    async fn create_template(
        &self,
        api_key: &str,
        name: &str,
        description: Option<String>,
    ) -> Result<ToolOutput, DispatchError> {
        let description = description.unwrap_or_else(default_template_description);
        let payload = ensure_success(
            self.client
                .create_template(api_key, name, &description)
                .await?,
        )?;
        let template = payload
            .get("template")
            .and_then(identifier)
            .unwrap_or_default();
        Ok(ToolOutput::Text(format!(
            "Template created successfully. Template ID: {template}"
        )))
    }

    async fn get_template(&self, api_key: &str, name: &str) -> Result<ToolOutput, DispatchError> {
        let templates = self.fetch_templates(api_key).await?;
        templates
            .into_iter()
            .find(|template| template.get("name").and_then(Value::as_str) == Some(name))
            .map(ToolOutput::Document)
            .ok_or_else(|| DispatchError::NotFound {
                operation: Operation::GetTemplate,
                name: name.to_string(),
            })
    }

    async fn list_templates(&self, api_key: &str) -> Result<ToolOutput, DispatchError> {
        let templates = self.fetch_templates(api_key).await?;
        Ok(ToolOutput::Document(Value::Array(templates)))
    }

    async fn fetch_templates(&self, api_key: &str) -> Result<Vec<Value>, DispatchError> {
        let payload = ensure_success(self.client.list_templates(api_key).await?)?;
        let templates = payload
            .get("templates")
            .and_then(Value::as_array)
            .cloned();
        templates.ok_or_else(|| UpstreamError::rejected(payload).into())
    }
}

fn default_template_description() -> String {
    format!(
        "Template created at {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
