use json2video_core::ToolRequest;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::Json2VideoMcp;

/// Parameters for creating a template.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateTemplateParams {
    /// json2video API key (optional, can also be set as environment variable `JSON2VIDEO_API_KEY`)
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<String>,
    /// Name of the template
    pub name: String,
    /// Description of the template
    #[serde(default)]
    pub description: Option<String>,
}

/// Parameters for fetching a template by name.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetTemplateParams {
    /// json2video API key (optional, can also be set as environment variable `JSON2VIDEO_API_KEY`)
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<String>,
    /// Name of the template to search for
    pub name: String,
}

/// Parameters for listing templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListTemplatesParams {
    /// json2video API key (optional, can also be set as environment variable `JSON2VIDEO_API_KEY`)
    #[serde(rename = "apiKey", default)]
    pub api_key: Option<String>,
}

#[tool_router(router = tool_router_templates, vis = "pub")]
impl Json2VideoMcp {
    #[tool(description = "Create a new template in json2video")]
    async fn create_template(
        &self,
        Parameters(params): Parameters<CreateTemplateParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = ToolRequest::CreateTemplate {
            name: params.name,
            description: params.description,
        };
        self.run(request, params.api_key).await
    }

    #[tool(description = "Get template details from json2video")]
    async fn get_template(
        &self,
        Parameters(params): Parameters<GetTemplateParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = ToolRequest::GetTemplate { name: params.name };
        self.run(request, params.api_key).await
    }

    #[tool(description = "List all available templates from json2video")]
    async fn list_templates(
        &self,
        Parameters(params): Parameters<ListTemplatesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run(ToolRequest::ListTemplates, params.api_key).await
    }
}
