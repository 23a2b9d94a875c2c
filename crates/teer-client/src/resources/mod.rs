//! Resource namespaces exposed by [`TeerClient`](crate::TeerClient).

mod billing;
mod ingest;

pub use billing::{Billing, MeterEvents};
pub use ingest::Ingest;
