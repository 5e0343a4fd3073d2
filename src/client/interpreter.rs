//! Interpretation of HTTP outcomes at the transport boundary.

use http::StatusCode;
use serde_json::Value;

use crate::error::OutscraperError;
use crate::models::ExecutionMode;

/// The useful part of a successful response
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Async job/status envelope, returned verbatim
    Job(Value),
    /// Contents of the `data` field of a synchronous response
    Data(Value),
}

impl Payload {
    pub fn mode(&self) -> ExecutionMode {
        match self {
            Payload::Job(_) => ExecutionMode::Async,
            Payload::Data(_) => ExecutionMode::Sync,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Payload::Job(value) | Payload::Data(value) => value,
        }
    }
}

/// Decide success or failure and extract the payload
///
/// Any 2xx status is a success. A synchronous body without `data` yields an
/// empty list rather than an error; an empty body counts as one without
/// `data`. Bodies that are not JSON at all fail with
/// [`OutscraperError::Parse`].
pub fn interpret(
    status: StatusCode,
    body: &str,
    mode: ExecutionMode,
) -> Result<Payload, OutscraperError> {
    if !status.is_success() {
        return Err(OutscraperError::RemoteRequestFailed {
            status_code: status.as_u16(),
            body: body.to_string(),
        });
    }

    let decoded: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body)?
    };

    match mode {
        ExecutionMode::Async => Ok(Payload::Job(decoded)),
        ExecutionMode::Sync => {
            let data = match decoded {
                Value::Object(mut map) => map.remove("data"),
                _ => None,
            };
            let data = data.unwrap_or_else(|| {
                tracing::warn!("response body has no 'data' field; treating as no results");
                Value::Array(Vec::new())
            });
            Ok(Payload::Data(data))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sync_success_extracts_data() {
        let payload = interpret(
            StatusCode::OK,
            r#"{"id": "abc", "status": "Success", "data": [[{"name": "Cafe"}]]}"#,
            ExecutionMode::Sync,
        )
        .unwrap();
        assert_eq!(payload, Payload::Data(json!([[{"name": "Cafe"}]])));
    }

    #[test]
    fn test_async_success_returns_envelope() {
        let body = r#"{"id": "job-1", "status": "Pending", "results_location": "https://x/requests/job-1"}"#;
        let payload = interpret(StatusCode::ACCEPTED, body, ExecutionMode::Async).unwrap();
        assert_eq!(payload.mode(), ExecutionMode::Async);
        assert_eq!(payload.into_value()["id"], "job-1");
    }

    #[test]
    fn test_non_2xx_fails_with_context() {
        let err = interpret(StatusCode::NOT_FOUND, "not found", ExecutionMode::Sync).unwrap_err();
        match err {
            OutscraperError::RemoteRequestFailed { status_code, body } => {
                assert_eq!(status_code, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = interpret(
            StatusCode::MULTIPLE_CHOICES,
            "{}",
            ExecutionMode::Async,
        )
        .unwrap_err();
        assert_eq!(err.status_code(), Some(300));
    }

    #[test]
    fn test_missing_data_is_empty() {
        let payload = interpret(StatusCode::OK, r#"{"status": "Success"}"#, ExecutionMode::Sync)
            .unwrap();
        assert_eq!(payload, Payload::Data(json!([])));

        let payload = interpret(StatusCode::OK, "", ExecutionMode::Sync).unwrap();
        assert_eq!(payload, Payload::Data(json!([])));

        let payload = interpret(StatusCode::OK, "[1, 2]", ExecutionMode::Sync).unwrap();
        assert_eq!(payload, Payload::Data(json!([])));
    }

    #[test]
    fn test_undecodable_body_is_parse_error() {
        let err = interpret(StatusCode::OK, "<html>", ExecutionMode::Sync).unwrap_err();
        assert!(matches!(err, OutscraperError::Parse(_)));
    }
}
