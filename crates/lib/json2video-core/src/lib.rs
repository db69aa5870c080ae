//! Core dispatch for json2video-mcp.
//!
//! This crate resolves tool names to operations, validates credentials and
//! arguments, calls the json2video REST API, and normalizes every upstream
//! response into a [`ToolOutput`] or a [`DispatchError`].

pub mod client;
pub mod dispatcher;
pub mod error;
pub mod operation;
pub mod request;
pub mod response;

pub use client::{DEFAULT_API_BASE, Json2VideoClient};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, UpstreamError};
pub use operation::Operation;
pub use request::{API_KEY_ARG, JsonObject, ToolRequest};
pub use response::{ToolOutput, ensure_success};
