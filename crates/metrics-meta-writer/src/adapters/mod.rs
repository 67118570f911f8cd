//! Adapters Layer - `EventSink` implementations for ingestion events

pub mod tracing_sink;

pub use tracing_sink::TracingIngestSink;
