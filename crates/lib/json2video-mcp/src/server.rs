//! MCP server runners for json2video-mcp.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use json2video_core::Dispatcher;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tracing::info;

use crate::Json2VideoMcp;

pub type ServeResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Configuration for the MCP streamable HTTP server.
#[derive(Debug, Clone)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    pub stateful_mode: bool,
    pub sse_keep_alive: Option<Duration>,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(15)),
        }
    }
}

/// Serves the MCP server over stdio until the peer disconnects or `shutdown` resolves.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    dispatcher: Arc<Dispatcher>,
    shutdown: impl Future<Output = ()> + Send,
) -> ServeResult {
    let service = Json2VideoMcp::with_dispatcher(dispatcher);
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    info!("json2video MCP server running on stdio");

    let cancel = running.cancellation_token();
    tokio::select! {
        quit = running.waiting() => {
            let reason = quit?;
            info!(?reason, "MCP session ended");
        }
        () = shutdown => {
            info!("shutting down MCP stdio transport");
            cancel.cancel();
        }
    }
    Ok(())
}

/// Builds the HTTP router exposing `/health` and the MCP endpoint at `/mcp`.
pub fn http_router(dispatcher: Arc<Dispatcher>, config: &McpHttpServerConfig) -> Router {
    let service: StreamableHttpService<Json2VideoMcp, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(Json2VideoMcp::with_dispatcher(dispatcher.clone())),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                sse_keep_alive: config.sse_keep_alive,
                stateful_mode: config.stateful_mode,
                ..Default::default()
            },
        );

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", service)
}

/// Serves the MCP server using streamable HTTP transport.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http(
    dispatcher: Arc<Dispatcher>,
    config: McpHttpServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> ServeResult {
    let app = http_router(dispatcher, &config);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "json2video MCP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
