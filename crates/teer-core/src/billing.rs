//! Billing types: per-ingest billing configuration and meter events.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Billing provider. Stripe is the only supported integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingProvider {
    /// Stripe usage-based billing.
    #[default]
    Stripe,
}

impl BillingProvider {
    /// Get the provider name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
        }
    }
}

/// Billing attached to an ingest event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Billing provider.
    pub provider: BillingProvider,
    /// Customer and meter selection.
    pub fields: BillingFields,
}

impl BillingConfig {
    /// Stripe billing with the given fields.
    #[must_use]
    pub fn stripe(fields: BillingFields) -> Self {
        Self {
            provider: BillingProvider::Stripe,
            fields,
        }
    }
}

/// Customer identity plus exactly one meter selection.
///
/// Deserializing fails when both or neither of `meter` and `meters` are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBillingFields")]
pub struct BillingFields {
    /// Billing-provider customer ID.
    pub customer: String,

    /// Customer email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Single meter or named meters.
    #[serde(flatten)]
    pub meter: MeterSelection,
}

impl BillingFields {
    /// Bill all usage against one meter.
    #[must_use]
    pub fn single(customer: impl Into<String>, meter: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            email: None,
            meter: MeterSelection::Single {
                meter: meter.into(),
            },
        }
    }

    /// Bill usage against several named meters.
    #[must_use]
    pub fn multi<K, V>(
        customer: impl Into<String>,
        meters: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            customer: customer.into(),
            email: None,
            meter: MeterSelection::Multi {
                meters: meters
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            },
        }
    }

    /// Set the customer email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Wire form of [`BillingFields`] before the meter selection is checked.
#[derive(Deserialize)]
struct RawBillingFields {
    customer: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    meter: Option<String>,
    #[serde(default)]
    meters: Option<BTreeMap<String, String>>,
}

impl TryFrom<RawBillingFields> for BillingFields {
    type Error = ValidationError;

    fn try_from(raw: RawBillingFields) -> Result<Self, Self::Error> {
        let meter = match (raw.meter, raw.meters) {
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingMeters),
            (None, None) => return Err(ValidationError::MissingMeter),
            (Some(meter), None) => MeterSelection::Single { meter },
            (None, Some(meters)) => MeterSelection::Multi { meters },
        };
        Ok(Self {
            customer: raw.customer,
            email: raw.email,
            meter,
        })
    }
}

/// Which meter(s) an ingest event is billed against.
///
/// Serialized flat into [`BillingFields`] as either `meter` or `meters`, so the
/// two can never both be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MeterSelection {
    /// One meter ID.
    Single {
        /// Meter ID.
        meter: String,
    },
    /// Meter IDs keyed by usage dimension (e.g. `input`, `output`).
    Multi {
        /// Dimension to meter ID.
        meters: BTreeMap<String, String>,
    },
}

/// Parameters for `POST billing/meter-events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterEventCreateParams {
    /// Billing provider.
    pub provider: BillingProvider,
    /// Event fields.
    pub fields: MeterEventFields,
}

impl MeterEventCreateParams {
    /// Stripe meter event for `event_name`, charging `value` to a customer.
    #[must_use]
    pub fn stripe(
        event_name: impl Into<String>,
        stripe_customer_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            provider: BillingProvider::Stripe,
            fields: MeterEventFields {
                event_name: event_name.into(),
                identifier: None,
                timestamp: None,
                payload: StripeMeterPayload {
                    stripe_customer_id: stripe_customer_id.into(),
                    value: value.into(),
                },
            },
        }
    }

    /// Set the idempotency identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.fields.identifier = Some(identifier.into());
        self
    }

    /// Set the event timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.fields.timestamp = Some(timestamp.to_rfc3339());
        self
    }
}

/// Fields of a meter event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterEventFields {
    /// Name of the meter event configured in the billing provider.
    pub event_name: String,

    /// Idempotency identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// ISO-8601 time the usage occurred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Stripe payload.
    pub payload: StripeMeterPayload,
}

/// Stripe meter event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeMeterPayload {
    /// Stripe customer ID (`cus_...`).
    pub stripe_customer_id: String,
    /// Usage value, as a decimal string.
    pub value: String,
}

/// Meter event as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterEvent {
    /// Meter event ID.
    pub id: String,
    /// Meter event name.
    pub event_name: String,
    /// Time the usage occurred.
    pub timestamp: String,
    /// Provider payload echoed back.
    pub payload: serde_json::Map<String, serde_json::Value>,
    /// Idempotency identifier.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}
