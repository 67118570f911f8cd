//! In-memory and discarding sinks

use parking_lot::Mutex;

use crate::ports::EventSink;

/// Keeps every emitted event, in order
#[derive(Debug)]
pub struct RecordingSink<E> {
    events: Mutex<Vec<E>>,
}

impl<E> Default for RecordingSink<E> {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> RecordingSink<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<E> {
        self.events.lock().clone()
    }

    /// Recorded events matching a predicate
    pub fn matching(&self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        self.events.lock().iter().filter(|e| predicate(e)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl<E: Send> EventSink<E> for RecordingSink<E> {
    fn emit(&self, event: E) {
        self.events.lock().push(event);
    }
}

/// Discards every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpSink;

impl<E> EventSink<E> for NoOpSink {
    fn emit(&self, _: E) {}
}
