//! # proclink-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PresenceSource` — one process-table observation per poll tick
//!   - `Actuator` — deliver an on/off command to the hub
//!   - `EventSink` — consume structured monitor events
//! - Provide the **orchestrator**: the single poll loop that owns the monitor
//!   state and the pending-command slot, applies the debounce state machine,
//!   and delivers commands with bounded retry
//! - Provide the retry policy used for transient actuator failures
//!
//! ## Dependency rule
//! Depends on `proclink-domain` only (plus `tokio` time/sync and the
//! cancellation token). Never imports adapter crates. Adapters depend on
//! *this* crate, not the reverse.

pub mod event;
pub mod orchestrator;
pub mod ports;
pub mod retry;
