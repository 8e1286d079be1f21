//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the orchestrator and
//! the adapter layer can depend on them without creating circular
//! dependencies.

pub mod actuator;
pub mod event_sink;
pub mod presence;

pub use actuator::Actuator;
pub use event_sink::EventSink;
pub use presence::PresenceSource;
