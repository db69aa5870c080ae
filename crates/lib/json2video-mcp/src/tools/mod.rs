//! MCP tool modules.
//!
//! Tools are grouped by upstream resource: render jobs and templates.

pub mod templates;
pub mod video;
