//! MCP (Model Context Protocol) implementation.

mod handlers;
pub mod server;
mod tools;

pub use handlers::OperationHandler;
pub use server::McpServer;
pub use tools::{input_schema, Tool, ToolHandler, ToolRegistry};
