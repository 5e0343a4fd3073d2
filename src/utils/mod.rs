//! Utility modules supporting the API client.
//!
//! - [`HttpClient`]: pooled reqwest client with timeouts and a crate user agent

mod http;

pub use http::HttpClient;
