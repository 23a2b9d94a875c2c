//! Teer Client SDK.
//!
//! This crate reports LLM token usage and billing meter events to the Teer
//! metering API. Payload types and validation live in [`teer_core`] and are
//! re-exported here.
//!
//! # Example
//!
//! ```no_run
//! use teer_client::{IngestPayload, MeterEventCreateParams, Provider, TeerClient, Usage};
//!
//! # async fn example() -> Result<(), teer_client::ClientError> {
//! let client = TeerClient::new("your-api-key")?;
//!
//! // Report one LLM call
//! let usage = Usage::new(1000, 2000);
//! let payload = IngestPayload::new(Provider::Anthropic, "claude-3-haiku-20240307", usage)
//!     .with_function_id("summarize-article");
//! let response = client.ingest().send(&payload).await?;
//! println!("Ingested: {response}");
//!
//! // Record metered usage with Stripe
//! let event = client
//!     .billing()
//!     .meter_events()
//!     .create(&MeterEventCreateParams::stripe("ai_search_api", "cus_12345678", "25"))
//!     .await?;
//! println!("Meter event: {}", event.id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
pub mod diagnostics;
mod error;
pub mod resources;
pub mod router;
pub mod transport;

pub use client::{
    ClientOptions, TeerClient, API_KEY_ENV, DEFAULT_API_VERSION, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT,
};
pub use diagnostics::{DiagnosticEvent, Diagnostics, NoopDiagnostics, TracingDiagnostics};
pub use error::ClientError;
pub use router::Resource;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestOptions};

pub use teer_core;
pub use teer_core::{
    AnthropicCache, BillingConfig, BillingFields, Cache, GoogleCache, IngestPayload, MeterEvent,
    MeterEventCreateParams, Metadata, OpenAiCache, Platform, Provider, Usage, ValidationError,
};
