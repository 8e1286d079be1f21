//! Event sink port — consuming structured monitor events.

use std::sync::Arc;

use crate::event::MonitorEvent;

/// Consumes the monitor's structured events (transitions, sends, failures).
///
/// The transport is the sink's concern; the orchestrator only hands events
/// over. Emission must not block the poll loop.
pub trait EventSink: Send + Sync {
    /// Consume one event.
    fn emit(&self, event: MonitorEvent);
}

impl<T: EventSink> EventSink for Arc<T> {
    fn emit(&self, event: MonitorEvent) {
        (**self).emit(event);
    }
}
