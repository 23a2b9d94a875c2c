//! Structural validation for outgoing payloads.
//!
//! Typed payloads already rule out most invalid shapes (required `usage`,
//! unsigned token counts, exclusive `meter`/`meters`). The typed validators
//! check what the type system cannot. The `*_value` validators accept raw JSON
//! from callers that build payloads dynamically, report the first violation by
//! field path, and then parse into the typed form.
//!
//! Unknown LLM providers are accepted and passed through unchanged. Unknown
//! billing providers are rejected.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::{
    BillingFields, BillingProvider, IngestPayload, MeterEventCreateParams, MeterSelection,
};

/// Validate a typed ingest payload.
///
/// # Errors
///
/// Returns an error when `provider` or `model` is empty, when billing or
/// platform identifiers are empty, or when a metadata value is not a scalar.
pub fn validate_ingest_payload(payload: &IngestPayload) -> Result<()> {
    if payload.provider.as_str().trim().is_empty() {
        return Err(ValidationError::empty("provider"));
    }
    if payload.model.trim().is_empty() {
        return Err(ValidationError::empty("model"));
    }

    if let Some(platform) = &payload.platform {
        if platform.rate_card_id.trim().is_empty() {
            return Err(ValidationError::empty("platform.rate_card_id"));
        }
    }

    if let Some(billing) = &payload.billing {
        validate_billing_fields(&billing.fields)?;
    }

    if let Some(metadata) = &payload.metadata {
        if let Some((key, _)) = metadata
            .iter()
            .find(|(_, value)| value.is_object() || value.is_array())
        {
            return Err(ValidationError::NonScalarMetadata(key.clone()));
        }
    }

    Ok(())
}

fn validate_billing_fields(fields: &BillingFields) -> Result<()> {
    if fields.customer.trim().is_empty() {
        return Err(ValidationError::empty("billing.fields.customer"));
    }

    match &fields.meter {
        MeterSelection::Single { meter } if meter.trim().is_empty() => {
            Err(ValidationError::empty("billing.fields.meter"))
        }
        MeterSelection::Multi { meters } if meters.is_empty() => {
            Err(ValidationError::empty("billing.fields.meters"))
        }
        MeterSelection::Multi { meters } => {
            match meters.iter().find(|(_, id)| id.trim().is_empty()) {
                Some((name, _)) => {
                    Err(ValidationError::empty(format!("billing.fields.meters.{name}")))
                }
                None => Ok(()),
            }
        }
        MeterSelection::Single { .. } => Ok(()),
    }
}

/// Validate a raw JSON ingest payload and parse it.
///
/// # Errors
///
/// Returns the first violation found: a missing or empty `provider`/`model`,
/// a missing `usage`, missing or negative `usage.input`/`usage.output`,
/// `billing.fields` with both or neither of `meter`/`meters`, or anything
/// [`validate_ingest_payload`] rejects.
pub fn validate_ingest_value(value: &Value) -> Result<IngestPayload> {
    let obj = as_object(value, "payload")?;

    require_str(obj, "provider", "provider")?;
    require_str(obj, "model", "model")?;

    let usage = as_object(require(obj, "usage", "usage")?, "usage")?;
    require_count(usage, "input", "usage.input")?;
    require_count(usage, "output", "usage.output")?;
    if let Some(cache) = optional(usage, "cache") {
        check_cache(as_object(cache, "usage.cache")?)?;
    }

    if let Some(billing) = optional(obj, "billing") {
        check_billing(as_object(billing, "billing")?)?;
    }

    let payload: IngestPayload = serde_json::from_value(value.clone())?;
    validate_ingest_payload(&payload)?;
    Ok(payload)
}

fn check_cache(cache: &Map<String, Value>) -> Result<()> {
    const KNOWN: [(&str, &[&str]); 3] = [
        (
            "anthropic",
            &["cache_creation_input_tokens", "cache_read_input_tokens"],
        ),
        ("openai", &["input_cached_tokens"]),
        ("google", &["cached_content_token_count", "thoughts_token_count"]),
    ];

    for (provider, fields) in KNOWN {
        let Some(record) = optional(cache, provider) else {
            continue;
        };
        let path = format!("usage.cache.{provider}");
        let record = as_object(record, &path)?;
        for field in fields {
            if optional(record, field).is_some() {
                require_count(record, field, &format!("{path}.{field}"))?;
            }
        }
    }
    Ok(())
}

fn check_billing(billing: &Map<String, Value>) -> Result<()> {
    check_billing_provider(billing, "billing.provider")?;

    let fields = as_object(require(billing, "fields", "billing.fields")?, "billing.fields")?;
    match (optional(fields, "meter"), optional(fields, "meters")) {
        (Some(_), Some(_)) => return Err(ValidationError::ConflictingMeters),
        (None, None) => return Err(ValidationError::MissingMeter),
        (Some(meter), None) if !meter.is_string() => {
            return Err(ValidationError::invalid("billing.fields.meter", "expected a string"));
        }
        (None, Some(meters)) if !meters.is_object() => {
            return Err(ValidationError::invalid("billing.fields.meters", "expected an object"));
        }
        _ => {}
    }

    require_str(fields, "customer", "billing.fields.customer")?;
    Ok(())
}

/// Validate typed meter event parameters.
///
/// # Errors
///
/// Returns an error when `event_name`, `stripe_customer_id` or `value` is
/// empty, or when `timestamp` is not an ISO-8601 date-time.
pub fn validate_meter_event_params(params: &MeterEventCreateParams) -> Result<()> {
    let fields = &params.fields;
    if fields.event_name.trim().is_empty() {
        return Err(ValidationError::empty("fields.event_name"));
    }
    if fields.payload.stripe_customer_id.trim().is_empty() {
        return Err(ValidationError::empty("fields.payload.stripe_customer_id"));
    }
    if fields.payload.value.trim().is_empty() {
        return Err(ValidationError::empty("fields.payload.value"));
    }
    if let Some(timestamp) = &fields.timestamp {
        check_timestamp(timestamp)?;
    }
    Ok(())
}

/// Accepts RFC 3339 and ISO-8601 date-times without an offset.
fn check_timestamp(timestamp: &str) -> Result<()> {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(_) => Ok(()),
        Err(e) => NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidTimestamp {
                value: timestamp.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Validate raw JSON meter event parameters and parse them.
///
/// # Errors
///
/// Returns an error when `provider` is not `stripe`, when `fields.event_name`,
/// `fields.payload.stripe_customer_id` or `fields.payload.value` is missing,
/// or when [`validate_meter_event_params`] rejects the parsed value.
pub fn validate_meter_event_value(value: &Value) -> Result<MeterEventCreateParams> {
    let obj = as_object(value, "params")?;
    check_billing_provider(obj, "provider")?;

    let fields = as_object(require(obj, "fields", "fields")?, "fields")?;
    require_str(fields, "event_name", "fields.event_name")?;
    for key in ["identifier", "timestamp"] {
        if optional(fields, key).is_some_and(|v| !v.is_string()) {
            return Err(ValidationError::invalid(format!("fields.{key}"), "expected a string"));
        }
    }

    let payload = as_object(require(fields, "payload", "fields.payload")?, "fields.payload")?;
    require_str(payload, "stripe_customer_id", "fields.payload.stripe_customer_id")?;
    require_str(payload, "value", "fields.payload.value")?;

    let params: MeterEventCreateParams = serde_json::from_value(value.clone())?;
    validate_meter_event_params(&params)?;
    Ok(params)
}

fn check_billing_provider(obj: &Map<String, Value>, path: &str) -> Result<()> {
    let provider = require(obj, "provider", path)?
        .as_str()
        .ok_or_else(|| ValidationError::invalid(path, "expected a string"))?;
    if provider != BillingProvider::Stripe.as_str() {
        return Err(ValidationError::UnsupportedBillingProvider(provider.to_string()));
    }
    Ok(())
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::NotAnObject(path.to_string()))
}

// Explicit nulls count as absent.
fn optional<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn require<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a Value> {
    optional(obj, key).ok_or_else(|| ValidationError::missing(path))
}

fn require_str<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a str> {
    let s = require(obj, key, path)?
        .as_str()
        .ok_or_else(|| ValidationError::invalid(path, "expected a string"))?;
    if s.trim().is_empty() {
        return Err(ValidationError::empty(path));
    }
    Ok(s)
}

fn require_count(obj: &Map<String, Value>, key: &str, path: &str) -> Result<u64> {
    let value = require(obj, key, path)?;
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_i64() {
        Some(n) => Err(ValidationError::NegativeTokenCount {
            field: path.to_string(),
            value: n,
        }),
        None => Err(ValidationError::invalid(path, "expected a non-negative integer")),
    }
}
