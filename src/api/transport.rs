//! HTTP transport.
//!
//! The transport performs the network call, validates the response status
//! and parses the JSON body. Everything above it deals only in
//! [`TransportRequest`]s and `serde_json::Value`s.

use std::future::Future;
use std::time::Duration;

use reqwest::{header, Client, Method, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument};

use super::error::{ApiError, Result};

/// A fully resolved request: method, absolute URL (token included) and body.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

impl TransportRequest {
    /// The URL path, safe to log (the token lives in the query).
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// Executes requests against the API.
///
/// Implementations must treat any non-2xx status as a failure and return
/// the parsed JSON body on success. An empty successful body is `null`.
pub trait Transport: Send + Sync {
    fn send(&self, request: TransportRequest) -> impl Future<Output = Result<Value>> + Send;
}

/// The default transport, backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with no request timeout.
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Create a transport whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Check the status and parse the body.
    async fn handle_response(response: Response) -> Result<Value> {
        let status = response.status();
        let path = response.url().path().to_string();
        let body = response.text().await?;

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&body)
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            debug!("Error response body: {}", body);
            Err(error_from_response(status, &path, &body))
        }
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path()))]
    async fn send(&self, request: TransportRequest) -> Result<Value> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .header(header::ACCEPT, "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        debug!(status = %response.status(), "Received response");
        Self::handle_response(response).await
    }
}

/// Create an appropriate error from an HTTP response.
fn error_from_response(status: StatusCode, path: &str, body: &str) -> ApiError {
    // Clubhouse returns {"message": "...", "errors": {...}} on failure
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let mut parts = Vec::new();
        if let Some(message) = json.get("message").and_then(Value::as_str) {
            parts.push(message.to_string());
        }
        if let Some(errors) = json.get("errors").and_then(Value::as_object) {
            parts.extend(errors.iter().map(|(k, v)| format!("{}: {}", k, v)));
        }
        if !parts.is_empty() {
            return ApiError::from_status(status, &parts.join(", "));
        }
    }

    ApiError::from_status(status, path)
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory transport for unit tests.

    use std::fmt;
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    type Responder = dyn Fn(&TransportRequest) -> Result<Value> + Send + Sync;

    /// Records every request and answers with a canned responder.
    #[derive(Clone)]
    pub struct StubTransport {
        requests: Arc<Mutex<Vec<TransportRequest>>>,
        responder: Arc<Responder>,
    }

    impl StubTransport {
        pub fn new(
            responder: impl Fn(&TransportRequest) -> Result<Value> + Send + Sync + 'static,
        ) -> Self {
            Self {
                requests: Arc::default(),
                responder: Arc::new(responder),
            }
        }

        /// Always answer with `value`.
        pub fn returning(value: Value) -> Self {
            Self::new(move |_| Ok(value.clone()))
        }

        /// Answer with a description of the request itself.
        pub fn echo() -> Self {
            Self::new(|request| {
                Ok(json!({
                    "method": request.method.as_str(),
                    "path": request.path(),
                    "body": request.body.clone(),
                }))
            })
        }

        pub fn requests(&self) -> Vec<TransportRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl fmt::Debug for StubTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("StubTransport").finish_non_exhaustive()
        }
    }

    impl Transport for StubTransport {
        async fn send(&self, request: TransportRequest) -> Result<Value> {
            let response = (self.responder)(&request);
            self.requests.lock().unwrap().push(request);
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_response_uses_message() {
        let err = error_from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "/api/v1/stories",
            r#"{"message": "The request included invalid or missing parameters.", "errors": {"name": "missing"}}"#,
        );
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 422);
                assert!(message.starts_with("The request included invalid"));
                assert!(message.contains("name: \"missing\""));
            }
            other => panic!("Expected Rejected error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_response_falls_back_to_path() {
        let err = error_from_response(StatusCode::NOT_FOUND, "/api/v1/stories/9", "Not Found");
        match err {
            ApiError::NotFound(context) => assert_eq!(context, "/api/v1/stories/9"),
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_response_empty_body() {
        let err = error_from_response(StatusCode::UNAUTHORIZED, "/api/v1/epics", "");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_request_path_hides_query() {
        let request = TransportRequest {
            method: Method::GET,
            url: Url::parse("https://api.clubhouse.io/api/v1/epics?token=secret").unwrap(),
            body: None,
        };
        assert_eq!(request.path(), "/api/v1/epics");
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new().is_ok());
        assert!(HttpTransport::with_timeout(Duration::from_secs(5)).is_ok());
    }
}
