//! Line-delimited JSON-RPC responder for json2video-mcp.
//!
//! Reads one JSON-RPC 2.0 request per line, dispatches it, and writes one
//! response per line. Requests are handled concurrently; the `id` member
//! correlates responses with requests.

pub mod envelope;

use std::sync::Arc;

use json2video_core::request::api_key_arg;
use json2video_core::{Dispatcher, JsonObject};
use serde_json::Value;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub use envelope::{RpcError, RpcResponse};

use crate::envelope::{INVALID_REQUEST, PARSE_ERROR};

/// Handles a single request line and returns its response.
///
/// A missing `id`, or a line too malformed to carry one, is answered with
/// `"id": null`.
pub async fn handle_line(dispatcher: &Dispatcher, line: &str) -> RpcResponse {
    let message: Value = match serde_json::from_str(line) {
        Ok(message) => message,
        Err(err) => {
            return RpcResponse::failure(
                Value::Null,
                RpcError::new(PARSE_ERROR, format!("invalid JSON: {err}")),
            );
        }
    };
    let Value::Object(mut message) = message else {
        return RpcResponse::failure(
            Value::Null,
            RpcError::new(INVALID_REQUEST, "request must be a JSON object"),
        );
    };

    let id = message.remove("id").unwrap_or(Value::Null);
    let Some(method) = message.get("method").and_then(Value::as_str).map(str::to_string) else {
        return RpcResponse::failure(id, RpcError::new(INVALID_REQUEST, "method is required"));
    };
    let params = match message.remove("params") {
        None | Some(Value::Null) => JsonObject::new(),
        Some(Value::Object(params)) => params,
        Some(_) => {
            return RpcResponse::failure(
                id,
                RpcError::new(INVALID_REQUEST, "params must be an object"),
            );
        }
    };

    // `params.apiKey` outranks a top-level `apiKey`.
    let api_key = api_key_arg(&params)
        .or_else(|| api_key_arg(&message))
        .map(str::to_string);
    debug!(%method, has_id = !id.is_null(), has_key = api_key.is_some(), "line request received");

    match dispatcher.handle(&method, params, api_key.as_deref()).await {
        Ok(output) => RpcResponse::success(id, output.into_value()),
        Err(err) => RpcResponse::failure(id, err.into()),
    }
}

/// Serves requests from `reader` until EOF, writing responses to `writer`.
///
/// Returns once every in-flight request has been answered and flushed. A line
/// that is not valid UTF-8 is answered with a parse error and reading goes on.
///
/// # Errors
/// Returns read or write failures on the underlying streams.
pub async fn serve<R, W>(dispatcher: Arc<Dispatcher>, mut reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<(), io::Error>(())
    });

    info!("json2video line responder running");
    loop {
        let mut raw = Vec::new();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            break;
        }
        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "request line is not valid UTF-8");
                let response = RpcResponse::failure(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("invalid UTF-8: {err}")),
                );
                if tx.send(response.to_line()).is_err() {
                    warn!("response dropped: writer closed");
                }
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let dispatcher = dispatcher.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let response = handle_line(&dispatcher, &line).await;
            if tx.send(response.to_line()).is_err() {
                warn!("response dropped: writer closed");
            }
        });
    }
    drop(tx);

    writer_task
        .await
        .map_err(|err| io::Error::other(format!("writer task failed: {err}")))??;
    info!("json2video line responder finished");
    Ok(())
}

/// Serves the line protocol over the process's stdin and stdout.
///
/// # Errors
/// Returns read or write failures on stdio.
pub async fn serve_stdio(dispatcher: Arc<Dispatcher>) -> io::Result<()> {
    let reader = io::BufReader::new(io::stdin());
    serve(dispatcher, reader, io::stdout()).await
}
