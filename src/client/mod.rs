//! HTTP client for the Outscraper API.
//!
//! [`OutscraperClient`] ties the pieces of one call together: it plans the
//! request, performs a single GET round trip with the credential headers,
//! interprets the status and body, and normalizes the payload. The client
//! holds no per-call state, so one instance can serve concurrent callers.
//!
//! ```rust,no_run
//! use outscraper_mcp::client::{ApiCredentials, OutscraperClient};
//! use outscraper_mcp::models::{OperationRequest, WebSearchOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OutscraperClient::new(ApiCredentials::new("my-key"))?;
//! let request = OperationRequest::WebSearch {
//!     query: "rust async runtime".into(),
//!     options: WebSearchOptions::default(),
//! };
//! let outcome = client.call(&request, None).await?;
//! println!("{} records", outcome.records.len());
//! # Ok(())
//! # }
//! ```

mod interpreter;

pub use interpreter::{interpret, Payload};

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::config::ApiConfig;
use crate::dispatch::{self, DispatchPlan};
use crate::error::OutscraperError;
use crate::models::{ExecutionMode, NormalizedRecord, Operation, OperationRequest};
use crate::normalize::normalize;
use crate::utils::HttpClient;

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.app.outscraper.com";

/// Static client-identifier tag sent with every request
pub const DEFAULT_CLIENT_TAG: &str = "MCP Server";

const API_KEY_HEADER: &str = "X-API-KEY";
const CLIENT_HEADER: &str = "client";

/// Credential and client tag sent as request headers
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    api_key: String,
    client_tag: String,
}

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client_tag: DEFAULT_CLIENT_TAG.to_string(),
        }
    }

    pub fn with_client_tag(mut self, client_tag: impl Into<String>) -> Self {
        self.client_tag = client_tag.into();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn client_tag(&self) -> &str {
        &self.client_tag
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"<redacted>")
            .field("client_tag", &self.client_tag)
            .finish()
    }
}

/// Result of one complete call
#[derive(Debug, Clone, Serialize)]
pub struct CallOutcome {
    pub operation: Operation,
    pub mode: ExecutionMode,
    pub records: Vec<NormalizedRecord>,
}

impl CallOutcome {
    /// Tool output: `{ operation, mode, count, records }`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "operation": self.operation.tool_name(),
            "mode": self.mode,
            "count": self.records.len(),
            "records": crate::normalize::records_to_value(&self.records),
        })
    }
}

/// Client for the Outscraper REST API
#[derive(Debug, Clone)]
pub struct OutscraperClient {
    http: HttpClient,
    credentials: ApiCredentials,
    base_url: Url,
    /// Deadline used when a call does not supply one
    timeout: Duration,
}

impl OutscraperClient {
    /// Create a client pointed at the production API with a 30 second default deadline
    pub fn new(credentials: ApiCredentials) -> Result<Self, OutscraperError> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    /// Create a client with a custom base URL (used against mock servers in tests)
    ///
    /// `timeout` is the default deadline for calls that do not pass one.
    pub fn with_base_url(
        credentials: ApiCredentials,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, OutscraperError> {
        let http = HttpClient::new()
            .map_err(|e| OutscraperError::Config(format!("failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            OutscraperError::Config(format!("invalid base URL '{}': {}", base_url, e))
        })?;

        Ok(Self {
            http,
            credentials,
            base_url,
            timeout,
        })
    }

    /// Create a client from the `[api]` configuration section
    pub fn from_config(config: &ApiConfig) -> Result<Self, OutscraperError> {
        let credentials =
            ApiCredentials::new(config.api_key.clone()).with_client_tag(config.client_tag.clone());
        Self::with_base_url(
            credentials,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL of an endpoint path
    pub fn endpoint(&self, path: &str) -> Result<Url, OutscraperError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| OutscraperError::Config(format!("invalid endpoint '{}': {}", joined, e)))
    }

    /// Plan, execute and normalize one operation request
    pub async fn call(
        &self,
        request: &OperationRequest,
        deadline: Option<Duration>,
    ) -> Result<CallOutcome, OutscraperError> {
        let plan = dispatch::plan(request)?;

        tracing::info!(
            operation = %plan.operation,
            queries = request.query().len(),
            mode = %plan.mode,
            "calling Outscraper"
        );

        let payload = self.execute(&plan, deadline).await?;
        let records = normalize(payload, plan.operation, plan.result_limit);

        tracing::debug!(operation = %plan.operation, records = records.len(), "normalized response");

        Ok(CallOutcome {
            operation: plan.operation,
            mode: plan.mode,
            records,
        })
    }

    /// Perform the round trip for a plan and interpret the outcome
    ///
    /// `deadline` bounds the network round trip only and defaults to the
    /// client's timeout. No retry is attempted.
    pub async fn execute(
        &self,
        plan: &DispatchPlan,
        deadline: Option<Duration>,
    ) -> Result<Payload, OutscraperError> {
        let deadline = deadline.unwrap_or(self.timeout);

        let (status, body) = tokio::time::timeout(deadline, self.round_trip(plan))
            .await
            .map_err(|_| {
                OutscraperError::Network(format!(
                    "request deadline of {:?} elapsed for {}",
                    deadline, plan.operation
                ))
            })??;

        let payload = interpret(status, &body, plan.mode);
        if let Err(ref e) = payload {
            tracing::warn!(operation = %plan.operation, "request failed: {}", e);
        }
        payload
    }

    async fn round_trip(
        &self,
        plan: &DispatchPlan,
    ) -> Result<(http::StatusCode, String), OutscraperError> {
        let url = self.endpoint(plan.path)?;

        let response = self
            .http
            .client()
            .get(url)
            .query(&plan.query_pairs())
            .header(API_KEY_HEADER, self.credentials.api_key())
            .header(CLIENT_HEADER, self.credentials.client_tag())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let client = OutscraperClient::with_base_url(
            ApiCredentials::new("k"),
            "http://127.0.0.1:1234/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("/maps/search-v3").unwrap().as_str(),
            "http://127.0.0.1:1234/maps/search-v3"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = OutscraperClient::with_base_url(
            ApiCredentials::new("k"),
            "not a url",
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, OutscraperError::Config(_)));
    }

    #[test]
    fn test_from_config_uses_timeout_as_default_deadline() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1234".to_string(),
            timeout_secs: 7,
            ..Default::default()
        };
        let client = OutscraperClient::from_config(&config).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(7));
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:1234/");
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let creds = ApiCredentials::new("secret-key").with_client_tag("tests");
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("tests"));
        assert_eq!(creds.api_key(), "secret-key");
    }
}
