//! Error types shared by the planner, the transport client and the tool layer.

/// Errors that can occur while dispatching an operation to Outscraper
#[derive(Debug, thiserror::Error)]
pub enum OutscraperError {
    /// Empty query input or options that do not fit the operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The API answered with a non-2xx status
    #[error("API request failed with status code: {status_code}, Response: {body}")]
    RemoteRequestFailed { status_code: u16, body: String },

    /// Transport failure, including an elapsed deadline
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx body that could not be decoded as JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Bad client configuration (base URL, HTTP client construction)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OutscraperError {
    /// HTTP status of a remote failure, if this is one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            OutscraperError::RemoteRequestFailed { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OutscraperError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OutscraperError::Network(format!("request deadline elapsed: {}", err))
        } else {
            OutscraperError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OutscraperError {
    fn from(err: serde_json::Error) -> Self {
        OutscraperError::Parse(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_failure_display() {
        let err = OutscraperError::RemoteRequestFailed {
            status_code: 404,
            body: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status code: 404, Response: not found"
        );
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn test_status_code_only_for_remote_failures() {
        assert_eq!(OutscraperError::InvalidInput("x".into()).status_code(), None);
    }
}
