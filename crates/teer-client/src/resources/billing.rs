//! `billing` resource and its `meter-events` sub-resource.

use serde_json::Value;
use teer_core::{
    validate_meter_event_params, validate_meter_event_value, MeterEvent, MeterEventCreateParams,
};

use crate::error::ClientError;
use crate::router::Resource;
use crate::transport::RequestOptions;
use crate::TeerClient;

/// Billing namespace. Has no operations of its own.
#[derive(Debug, Clone, Copy)]
pub struct Billing<'a> {
    client: &'a TeerClient,
}

impl<'a> Billing<'a> {
    pub(crate) fn new(client: &'a TeerClient) -> Self {
        Self { client }
    }

    /// Base URL of the billing namespace.
    #[must_use]
    pub fn url(&self) -> String {
        self.client.url_for(Resource::Billing)
    }

    /// Meter events sub-resource.
    #[must_use]
    pub fn meter_events(&self) -> MeterEvents<'a> {
        MeterEvents {
            client: self.client,
        }
    }
}

/// Records usage against billing-provider meters via
/// `POST {api_base}/billing/meter-events`.
#[derive(Debug, Clone, Copy)]
pub struct MeterEvents<'a> {
    client: &'a TeerClient,
}

impl MeterEvents<'_> {
    /// URL this resource posts to.
    #[must_use]
    pub fn url(&self) -> String {
        self.client.url_for(Resource::MeterEvents)
    }

    /// Create a meter event.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] without sending anything if the
    /// params are invalid, [`ClientError::Serialization`] if the response is
    /// not a meter event, otherwise any transport or status error.
    pub async fn create(&self, params: &MeterEventCreateParams) -> Result<MeterEvent, ClientError> {
        self.create_with_options(params, &RequestOptions::default())
            .await
    }

    /// Create a meter event with per-call headers or timeout.
    ///
    /// # Errors
    ///
    /// See [`MeterEvents::create`].
    pub async fn create_with_options(
        &self,
        params: &MeterEventCreateParams,
        options: &RequestOptions,
    ) -> Result<MeterEvent, ClientError> {
        validate_meter_event_params(params)?;
        let body = serde_json::to_value(params)?;
        let response = self.client.post(Resource::MeterEvents, body, options).await?;
        Ok(serde_json::from_value(response)?)
    }

    /// Validate and send raw JSON meter event params. The body is sent exactly as given.
    ///
    /// # Errors
    ///
    /// See [`MeterEvents::create`].
    pub async fn create_json(&self, params: &Value) -> Result<MeterEvent, ClientError> {
        self.create_json_with_options(params, &RequestOptions::default())
            .await
    }

    /// Raw JSON variant of [`MeterEvents::create_with_options`].
    ///
    /// # Errors
    ///
    /// See [`MeterEvents::create`].
    pub async fn create_json_with_options(
        &self,
        params: &Value,
        options: &RequestOptions,
    ) -> Result<MeterEvent, ClientError> {
        validate_meter_event_value(params)?;
        let response = self
            .client
            .post(Resource::MeterEvents, params.clone(), options)
            .await?;
        Ok(serde_json::from_value(response)?)
    }
}
