//! Daemon entry point for the json2video MCP server.
//!
//! Loads configuration from the environment, builds the dispatcher, and serves
//! the selected protocol until the peer disconnects or SIGINT arrives.

mod config;

use std::sync::Arc;

use json2video_core::{Dispatcher, Json2VideoClient};
use json2video_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Json2VideoConfig, Transport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Json2VideoConfig::from_args()?;
    info!(?config, "starting json2video-mcpd");

    let client = match config.request_timeout {
        Some(timeout) => Json2VideoClient::with_timeout(&config.api_base, timeout)?,
        None => Json2VideoClient::new(&config.api_base),
    };
    let dispatcher = Arc::new(Dispatcher::new(client).with_default_api_key(config.api_key));

    match config.transport {
        Transport::Stdio => serve_stdio(dispatcher, shutdown_signal()).await?,
        Transport::Http => {
            let http_config = McpHttpServerConfig::new(config.http_addr);
            serve_streamable_http(dispatcher, http_config, shutdown_signal()).await?;
        }
        Transport::Line => {
            tokio::select! {
                served = json2video_line::serve_stdio(dispatcher) => served?,
                () = shutdown_signal() => {}
            }
        }
    }

    info!("json2video-mcpd stopped");
    // A blocking stdin read can outlive the transport and would stall runtime teardown.
    std::process::exit(0)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received SIGINT, shutting down"),
        Err(err) => {
            warn!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    }
}
