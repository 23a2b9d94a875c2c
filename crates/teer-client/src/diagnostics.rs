//! Injectable diagnostics.
//!
//! The client never logs through global state. Each client carries a
//! [`Diagnostics`] sink, which defaults to [`NoopDiagnostics`]. Use
//! [`TracingDiagnostics`] to forward events to `tracing`.
//!
//! Diagnostics are supplementary: every failure reported here is also
//! returned to the caller.

use std::fmt;

use reqwest::Method;

use crate::error::ClientError;

/// One observable step of a request.
#[derive(Debug)]
pub enum DiagnosticEvent<'a> {
    /// A request is about to be sent.
    Request {
        /// HTTP method.
        method: &'a Method,
        /// Target URL.
        url: &'a str,
    },
    /// A response arrived (any status).
    Response {
        /// Target URL.
        url: &'a str,
        /// HTTP status code.
        status: u16,
    },
    /// The request failed in transport or returned a non-2xx status.
    Failure {
        /// Target URL.
        url: &'a str,
        /// The error returned to the caller.
        error: &'a ClientError,
    },
}

/// Sink for [`DiagnosticEvent`]s.
pub trait Diagnostics: Send + Sync + fmt::Debug {
    /// Record one event.
    fn record(&self, event: &DiagnosticEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn record(&self, _event: &DiagnosticEvent<'_>) {}
}

/// Forwards events to `tracing`: requests and responses at debug, failures at warn.
///
/// Request bodies and credentials are never included.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: &DiagnosticEvent<'_>) {
        match event {
            DiagnosticEvent::Request { method, url } => {
                tracing::debug!(method = %method, url = %url, "Sending Teer request");
            }
            DiagnosticEvent::Response { url, status } => {
                tracing::debug!(url = %url, status = %status, "Teer response received");
            }
            DiagnosticEvent::Failure { url, error } => {
                tracing::warn!(url = %url, error = %error, "Teer request failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_all(sink: &dyn Diagnostics) {
        let url = "https://track.teer.ai/v1/ingest";
        let error = ClientError::Status {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        sink.record(&DiagnosticEvent::Request {
            method: &Method::POST,
            url,
        });
        sink.record(&DiagnosticEvent::Response { url, status: 502 });
        sink.record(&DiagnosticEvent::Failure { url, error: &error });
    }

    #[test]
    fn tracing_sink_records_every_event_kind() {
        // No subscriber is installed, so events go to tracing's no-op dispatcher.
        record_all(&TracingDiagnostics);
    }

    #[test]
    fn noop_sink_accepts_every_event_kind() {
        record_all(&NoopDiagnostics);
    }
}
