//! Test-only event sink that remembers what it was told.

use std::sync::{Mutex, PoisonError};

use crate::{EventSink, RefreshEvent};

/// Sink collecting every emitted [`RefreshEvent`] in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RefreshEvent>>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<RefreshEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &RefreshEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
