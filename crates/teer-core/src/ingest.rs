//! The ingest payload and its attribution types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BillingConfig, Provider, Usage};

/// One usage report for a single LLM call, sent to `POST {api_base}/ingest`.
///
/// # Example
///
/// ```
/// use teer_core::{IngestPayload, Metadata, Provider, Usage};
///
/// let usage = Usage::new(1000, 2000);
/// let payload = IngestPayload::new(Provider::Anthropic, "claude-3-haiku-20240307", usage)
///     .with_function_id("summarize-article")
///     .with_trace("trace-123456", "span-abcdef")
///     .with_metadata(Metadata::new().with_user_id("user_123"));
///
/// assert!(teer_core::validate_ingest_payload(&payload).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestPayload {
    /// LLM provider.
    pub provider: Provider,

    /// Model name (e.g., "claude-3-haiku-20240307").
    pub model: String,

    /// Function or endpoint that made the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_id: Option<String>,

    /// Token usage.
    pub usage: Usage,

    /// Distributed trace ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,

    /// Span ID within the trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,

    /// Parent span ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,

    /// Whether the call ran through a batch API (affects pricing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<bool>,

    /// Teer platform settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// Billing to apply to this event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<BillingConfig>,

    /// Attribution metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl IngestPayload {
    /// Create a payload with the required fields.
    #[must_use]
    pub fn new(provider: impl Into<Provider>, model: impl Into<String>, usage: Usage) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            function_id: None,
            usage,
            trace_id: None,
            span_id: None,
            parent_span_id: None,
            batch: None,
            platform: None,
            billing: None,
            metadata: None,
        }
    }

    /// Set the function ID.
    #[must_use]
    pub fn with_function_id(mut self, function_id: impl Into<String>) -> Self {
        self.function_id = Some(function_id.into());
        self
    }

    /// Set trace and span IDs.
    #[must_use]
    pub fn with_trace(mut self, trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self.span_id = Some(span_id.into());
        self
    }

    /// Set the parent span ID.
    #[must_use]
    pub fn with_parent_span_id(mut self, parent_span_id: impl Into<String>) -> Self {
        self.parent_span_id = Some(parent_span_id.into());
        self
    }

    /// Mark the call as batched or not.
    #[must_use]
    pub fn with_batch(mut self, batch: bool) -> Self {
        self.batch = Some(batch);
        self
    }

    /// Select a rate card.
    #[must_use]
    pub fn with_rate_card(mut self, rate_card_id: impl Into<String>) -> Self {
        self.platform = Some(Platform {
            rate_card_id: rate_card_id.into(),
        });
        self
    }

    /// Attach billing.
    #[must_use]
    pub fn with_billing(mut self, billing: BillingConfig) -> Self {
        self.billing = Some(billing);
        self
    }

    /// Attach metadata. Empty metadata is dropped.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = (!metadata.is_empty()).then_some(metadata);
        self
    }
}

/// Teer platform settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Rate card used to price the event.
    pub rate_card_id: String,
}

/// Attribution metadata: an open map of scalar values.
///
/// The documented keys have typed setters; any other key can be added with
/// [`Metadata::with`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, serde_json::Value>);

macro_rules! metadata_setter {
    ($fn_name:ident, $key:literal) => {
        #[doc = concat!("Set `", $key, "`.")]
        #[must_use]
        pub fn $fn_name(self, value: impl Into<String>) -> Self {
            self.with($key, value.into())
        }
    };
}

impl Metadata {
    /// Empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    metadata_setter!(with_user_id, "user_id");
    metadata_setter!(with_organization_id, "organization_id");
    metadata_setter!(with_member_id, "member_id");
    metadata_setter!(with_team_id, "team_id");
    metadata_setter!(with_session_id, "session_id");
    metadata_setter!(with_request_id, "request_id");
    metadata_setter!(with_project_id, "project_id");

    /// Set an arbitrary key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
