//! `ingest` resource.

use serde_json::Value;
use teer_core::{validate_ingest_payload, validate_ingest_value, IngestPayload};

use crate::error::ClientError;
use crate::router::Resource;
use crate::transport::RequestOptions;
use crate::TeerClient;

/// Sends usage reports to `POST {api_base}/ingest`.
#[derive(Debug, Clone, Copy)]
pub struct Ingest<'a> {
    client: &'a TeerClient,
}

impl<'a> Ingest<'a> {
    pub(crate) fn new(client: &'a TeerClient) -> Self {
        Self { client }
    }

    /// URL this resource posts to.
    #[must_use]
    pub fn url(&self) -> String {
        self.client.url_for(Resource::Ingest)
    }

    /// Send a usage report.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] without sending anything if the
    /// payload is invalid, otherwise any transport or status error.
    pub async fn send(&self, payload: &IngestPayload) -> Result<Value, ClientError> {
        self.send_with_options(payload, &RequestOptions::default())
            .await
    }

    /// Send a usage report with per-call headers or timeout.
    ///
    /// # Errors
    ///
    /// See [`Ingest::send`].
    pub async fn send_with_options(
        &self,
        payload: &IngestPayload,
        options: &RequestOptions,
    ) -> Result<Value, ClientError> {
        validate_ingest_payload(payload)?;
        let body = serde_json::to_value(payload)?;
        self.client.post(Resource::Ingest, body, options).await
    }

    /// Validate and send a raw JSON usage report. The body is sent exactly as given.
    ///
    /// # Errors
    ///
    /// See [`Ingest::send`].
    pub async fn send_json(&self, payload: &Value) -> Result<Value, ClientError> {
        self.send_json_with_options(payload, &RequestOptions::default())
            .await
    }

    /// Raw JSON variant of [`Ingest::send_with_options`].
    ///
    /// # Errors
    ///
    /// See [`Ingest::send`].
    pub async fn send_json_with_options(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<Value, ClientError> {
        validate_ingest_value(payload)?;
        self.client
            .post(Resource::Ingest, payload.clone(), options)
            .await
    }
}
