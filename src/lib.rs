//! # Outscraper MCP
//!
//! A Model Context Protocol (MCP) server exposing Outscraper's data-extraction
//! endpoints: Google Maps search, reviews, photos and directions, Google web
//! and news search, Google Play reviews, and email/contact extraction.
//!
//! ## Architecture
//!
//! Every tool call runs the same pipeline:
//!
//! - [`dispatch`]: pick sync/async execution and build the outbound parameters
//! - [`client`]: one GET round trip, then status/body interpretation
//! - [`normalize`]: flatten endpoint-specific nesting into [`NormalizedRecord`]s
//!
//! Supporting modules:
//!
//! - [`models`]: operations, typed options and records
//! - [`mcp`]: tool registry and MCP server
//! - [`config`]: configuration management
//! - [`utils`]: HTTP client

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mcp;
pub mod models;
pub mod normalize;
pub mod utils;

// Re-export commonly used types
pub use client::{ApiCredentials, CallOutcome, OutscraperClient};
pub use error::OutscraperError;
pub use models::{ExecutionMode, NormalizedRecord, Operation, OperationRequest, QueryInput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
