//! Monitor events — immutable records of what the poll loop did.

use proclink_domain::command::ActuatorCommand;
use proclink_domain::monitor::MonitorState;
use proclink_domain::time::Timestamp;

/// A structured event emitted by the orchestrator to the configured sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The state machine moved to a new state.
    StateTransition {
        from: MonitorState,
        to: MonitorState,
        at: Timestamp,
    },
    /// A command was delivered to the hub.
    CommandSent {
        command: ActuatorCommand,
        /// Send attempts used, including the successful one.
        attempts: u32,
    },
    /// A command could not be delivered.
    CommandFailed {
        command: ActuatorCommand,
        /// Send attempts used before giving up on this tick.
        attempts: u32,
        /// Display form of the final error.
        error: String,
        /// Fatal failures drop the command; transient exhaustion keeps it
        /// pending for the next tick.
        fatal: bool,
    },
}
