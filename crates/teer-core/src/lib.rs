//! Core payload types for Teer usage metering.
//!
//! This crate defines the wire schema the Teer client sends, plus the
//! validation rules that run before anything leaves the process:
//!
//! - **Usage**: `Usage`, `Cache`, and the per-provider cache records
//! - **Ingest**: `IngestPayload`, `Metadata`, `Platform`
//! - **Billing**: `BillingConfig`, `BillingFields`, meter event params and responses
//! - **Validation**: typed and raw-JSON validators
//! - **Extraction**: best-effort adapters from vendor response usage blocks
//!
//! Nothing here performs I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod billing;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod usage;
pub mod validate;

pub use billing::{
    BillingConfig, BillingFields, BillingProvider, MeterEvent, MeterEventCreateParams,
    MeterEventFields, MeterSelection, StripeMeterPayload,
};
pub use error::{Result, ValidationError};
pub use extract::{extract_usage, AnthropicUsage, GoogleUsageMetadata, OpenAiUsage, UsageAdapter};
pub use ingest::{IngestPayload, Metadata, Platform};
pub use usage::{AnthropicCache, Cache, GoogleCache, OpenAiCache, Provider, Usage};
pub use validate::{
    validate_ingest_payload, validate_ingest_value, validate_meter_event_params,
    validate_meter_event_value,
};
