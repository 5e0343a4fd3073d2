//! Tool handler that runs one Outscraper operation per call.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::tools::ToolHandler;
use crate::client::OutscraperClient;
use crate::models::{Operation, OperationRequest};

/// Handler for any of the eight operation tools
#[derive(Debug)]
pub struct OperationHandler {
    pub operation: Operation,
    pub client: Arc<OutscraperClient>,
    pub deadline: Option<Duration>,
}

#[async_trait::async_trait]
impl ToolHandler for OperationHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let request = OperationRequest::from_args(self.operation, &args).map_err(|e| {
            tracing::warn!("Rejected {} call: {}", self.operation, e);
            e.to_string()
        })?;

        tracing::info!(
            "Running {} for {} quer{}",
            self.operation,
            request.query().len(),
            if request.query().len() == 1 { "y" } else { "ies" }
        );

        match self.client.call(&request, self.deadline).await {
            Ok(outcome) => Ok(outcome.to_json()),
            Err(e) => {
                tracing::error!("Error in {}: {}", self.operation, e);
                Err(e.to_string())
            }
        }
    }
}
