//! [`EventSink`] that forwards refresh events to the `log` facade.

use herald_core::{EventSink, RefreshEvent};

/// Sink writing each [`RefreshEvent`] as one log record.
///
/// Failures go out at `error`, resets and refreshes at `info`, and sources
/// with nothing new at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &RefreshEvent) {
        match event {
            RefreshEvent::Refreshed { name, items } => {
                log::info!("refreshed {name}: {items} new item(s) marked as pushed");
            }
            RefreshEvent::NothingNew { name } => log::debug!("refreshed {name}: nothing new"),
            RefreshEvent::Reset { name, count } => {
                log::info!("reset {name}: cleared {count} pushed flag(s)");
            }
            RefreshEvent::Failed { name, message } => log::error!("{name}: {message}"),
        }
    }
}
