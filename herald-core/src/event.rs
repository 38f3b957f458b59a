//! Structured events emitted by refresh and reset operations.
//!
//! Engines report what happened through an [`EventSink`] instead of logging
//! from inside the algorithms; the reply string they return is unaffected by
//! whichever sink is installed.

/// Outcome of one refresh or reset call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshEvent {
    /// Unpushed items were found, marked and persisted.
    Refreshed {
        /// Source name key.
        name: String,
        /// Number of items returned to the caller.
        items: usize,
    },
    /// The target held nothing unpushed; no write happened.
    NothingNew {
        /// Source name key.
        name: String,
    },
    /// A reset finished; `count` may be zero.
    Reset {
        /// Source name key.
        name: String,
        /// Number of flags cleared.
        count: usize,
    },
    /// The call failed and an error reply was produced.
    Failed {
        /// Source name key.
        name: String,
        /// Rendered failure.
        message: String,
    },
}

impl RefreshEvent {
    /// Name key of the source the event concerns.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Refreshed { name, .. }
            | Self::NothingNew { name }
            | Self::Reset { name, .. }
            | Self::Failed { name, .. } => name,
        }
    }

    /// Whether the event records a failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Observer receiving [`RefreshEvent`]s.
pub trait EventSink {
    /// Record one event.
    fn emit(&self, event: &RefreshEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &RefreshEvent) {}
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn emit(&self, event: &RefreshEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn emit(&self, event: &RefreshEvent) {
        (**self).emit(event);
    }
}
