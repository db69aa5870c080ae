//! MCP server implementation for json2video-mcp.
//!
//! This crate wires the core dispatcher into rmcp tool handlers and exposes
//! the five json2video operations as MCP tools.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use json2video_core::{Dispatcher, ToolRequest};
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool_handler,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

pub use tools::templates::{CreateTemplateParams, GetTemplateParams, ListTemplatesParams};
pub use tools::video::{GenerateVideoParams, GetVideoStatusParams};

const SERVER_INSTRUCTIONS: &str = r"json2video-mcp renders videos and manages templates through the json2video API.

Workflow:
1. Call `generate_video` with a `scenes` array (plus optional movie settings such as
   `resolution`, `quality`, `width`, `height`, `elements`). It returns a project id.
2. Poll `get_video_status` with that `project` id until the movie is done; the response
   contains the full status document including the final URL.
3. Manage reusable definitions with `create_template`, `get_template` (exact name match),
   and `list_templates`.

Notes:
- Every tool accepts an optional `apiKey`. When omitted, the server uses the
  JSON2VIDEO_API_KEY it was started with.
- Creation tools are not idempotent; each call creates a new upstream resource.";

/// MCP server wrapper around the dispatcher and tool routers.
#[derive(Clone)]
pub struct Json2VideoMcp {
    tool_router: ToolRouter<Self>,
    dispatcher: Arc<Dispatcher>,
}

impl Json2VideoMcp {
    /// Creates a new server owning the dispatcher.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::with_dispatcher(Arc::new(dispatcher))
    }

    /// Creates a new server using a shared dispatcher handle.
    #[must_use]
    pub fn with_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        let tool_router = Self::tool_router_video() + Self::tool_router_templates();
        Self {
            tool_router,
            dispatcher,
        }
    }

    /// Names of every registered tool.
    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }

    /// Runs a typed request and wraps the output as a single text block.
    pub(crate) async fn run(
        &self,
        request: ToolRequest,
        api_key: Option<String>,
    ) -> Result<CallToolResult, ErrorData> {
        let output = self
            .dispatcher
            .execute(request, api_key.as_deref())
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::text(output.to_text())]))
    }
}

#[tool_handler]
impl ServerHandler for Json2VideoMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
