//! Adapters Layer - `EventSink` implementations
//!
//! - `TracingFilterSink`: forwards filter events to `tracing`
//! - `RecordingSink`: keeps events in memory (tests, diagnostics)
//! - `NoOpSink`: drops everything

pub mod recording;
pub mod tracing_sink;

pub use recording::{NoOpSink, RecordingSink};
pub use tracing_sink::TracingFilterSink;
