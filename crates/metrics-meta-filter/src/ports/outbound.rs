//! Outbound Ports (Driven Ports)

/// Destination for structured observability events (Driven Port)
///
/// Components receive their sink at construction instead of writing to a
/// process-wide logger, so tests can observe exactly what was emitted.
pub trait EventSink<E>: Send + Sync {
    /// Record one event. Must not block for long: it runs on hot paths.
    fn emit(&self, event: E);
}
