//! HTTP transport.
//!
//! [`HttpTransport`] is the raw capability: send one request, return the status
//! and body text. [`ReqwestTransport`] is the default implementation. The
//! crate-private `ApiTransport` layers the Teer conventions on top: bearer
//! auth, JSON content type, status checking, and the plain-text fallback.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{json, Value};

use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::error::ClientError;

/// A single outbound HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Fully-qualified URL.
    pub url: String,
    /// Request headers, auth included.
    pub headers: HeaderMap,
    /// JSON body.
    pub body: Option<Value>,
    /// Timeout for this request.
    pub timeout: Duration,
}

/// Raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Something that can perform one HTTP round trip.
///
/// Implementations must not retry: the client promises exactly one attempt
/// per operation.
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    /// Send the request and return the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] or [`ClientError::Http`] when no
    /// response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a fresh connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .timeout(request.timeout);

        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(from_reqwest)?;

        Ok(HttpResponse { status, body })
    }
}

fn from_reqwest(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Http(err)
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers, merged over the defaults. `Authorization` is always
    /// taken from the client's API key and cannot be overridden here.
    pub headers: HeaderMap,
    /// Timeout for this call; the client default when `None`.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Set the timeout for this call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Teer request conventions over an [`HttpTransport`].
#[derive(Debug, Clone)]
pub(crate) struct ApiTransport {
    authorization: HeaderValue,
    http: Arc<dyn HttpTransport>,
    diagnostics: Arc<dyn Diagnostics>,
    timeout: Duration,
}

impl ApiTransport {
    pub(crate) fn new(
        api_key: &str,
        http: Arc<dyn HttpTransport>,
        diagnostics: Arc<dyn Diagnostics>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
            ClientError::Configuration("API key contains characters not allowed in a header".into())
        })?;
        authorization.set_sensitive(true);

        Ok(Self {
            authorization,
            http,
            diagnostics,
            timeout,
        })
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one request and decode the response.
    pub(crate) async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
        options: &RequestOptions,
    ) -> Result<Value, ClientError> {
        self.diagnostics.record(&DiagnosticEvent::Request {
            method: &method,
            url,
        });

        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers: self.headers(&options.headers),
            body,
            timeout: options.timeout.unwrap_or(self.timeout),
        };

        let result = match self.http.send(request).await {
            Ok(response) => {
                self.diagnostics.record(&DiagnosticEvent::Response {
                    url,
                    status: response.status,
                });
                decode_response(response)
            }
            Err(err) => Err(err),
        };

        if let Err(error) = &result {
            self.diagnostics
                .record(&DiagnosticEvent::Failure { url, error });
        }
        result
    }

    fn headers(&self, extra: &HeaderMap) -> HeaderMap {
        let mut headers = extra.clone();
        headers.remove(AUTHORIZATION);
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers
    }
}

/// Map a raw response to the call result.
///
/// Non-2xx statuses become [`ClientError::Status`] with the body untouched.
/// A 2xx body that is not JSON is wrapped as `{"text": body}`.
pub(crate) fn decode_response(response: HttpResponse) -> Result<Value, ClientError> {
    if !(200..300).contains(&response.status) {
        return Err(ClientError::Status {
            status: response.status,
            body: response.body,
        });
    }

    match serde_json::from_str(&response.body) {
        Ok(value) => Ok(value),
        Err(_) => Ok(json!({ "text": response.body })),
    }
}
