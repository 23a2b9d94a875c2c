//! Common test utilities for teer-client integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use teer_client::{
    ClientError, ClientOptions, DiagnosticEvent, Diagnostics, HttpRequest, HttpResponse,
    HttpTransport, TeerClient,
};
use wiremock::MockServer;

/// API key used by every test client.
pub const API_KEY: &str = "k";

/// Client pointed at a mock server.
pub fn client_for(server: &MockServer) -> TeerClient {
    TeerClient::with_options(options_for(server)).expect("client should build")
}

/// Options pointed at a mock server, for tests that customize further.
pub fn options_for(server: &MockServer) -> ClientOptions {
    ClientOptions::default()
        .with_api_key(API_KEY)
        .with_base_url(server.uri())
}

/// Transport that records requests instead of sending them.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    response: HttpResponse,
}

impl RecordingTransport {
    /// Answer every request with `status` and `body`.
    pub fn responding(status: u16, body: &str) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            response: HttpResponse {
                status,
                body: body.to_string(),
            },
        }
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Client that sends through this transport.
    pub fn client(&self) -> TeerClient {
        TeerClient::with_options(
            ClientOptions::default()
                .with_api_key(API_KEY)
                .with_base_url("https://h")
                .with_transport(self.clone()),
        )
        .expect("client should build")
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Diagnostics sink that keeps a one-line summary of each event.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingDiagnostics {
    /// Summaries recorded so far.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn record(&self, event: &DiagnosticEvent<'_>) {
        let line = match event {
            DiagnosticEvent::Request { method, url } => format!("request {method} {url}"),
            DiagnosticEvent::Response { status, .. } => format!("response {status}"),
            DiagnosticEvent::Failure { error, .. } => {
                format!("failure {}", error.status().unwrap_or(0))
            }
        };
        self.events.lock().unwrap().push(line);
    }
}
