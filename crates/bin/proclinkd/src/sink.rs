//! Tracing-backed event sink.

use proclink_app::event::MonitorEvent;
use proclink_app::ports::EventSink;

/// Emits monitor events as structured `tracing` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: MonitorEvent) {
        match event {
            MonitorEvent::StateTransition { from, to, at } => {
                tracing::info!(
                    target: "proclink::events",
                    event = "state_transition",
                    %from,
                    %to,
                    %at,
                );
            }
            MonitorEvent::CommandSent { command, attempts } => {
                tracing::info!(
                    target: "proclink::events",
                    event = "command_sent",
                    entity = %command.target,
                    state = %command.desired_state,
                    attempts,
                );
            }
            MonitorEvent::CommandFailed {
                command,
                attempts,
                error,
                fatal,
            } => {
                tracing::warn!(
                    target: "proclink::events",
                    event = "command_failed",
                    entity = %command.target,
                    state = %command.desired_state,
                    attempts,
                    fatal,
                    error,
                );
            }
        }
    }
}
