//! Actuator command — the desired on/off state for the target entity.

use serde::{Deserialize, Serialize};

use crate::entity::EntityRef;

/// The power state the entity should be driven to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    On,
    Off,
}

impl DesiredState {
    /// The hub service name that realises this state (`turn_on` / `turn_off`).
    #[must_use]
    pub fn service(self) -> &'static str {
        match self {
            Self::On => "turn_on",
            Self::Off => "turn_off",
        }
    }
}

impl std::fmt::Display for DesiredState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

/// A single on/off request for one entity.
///
/// Emitted at most once per logical transition of the monitor state machine
/// and consumed immediately by the actuator; never batched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorCommand {
    /// The entity to drive.
    pub target: EntityRef,
    /// The state to drive it to.
    pub desired_state: DesiredState,
}

impl ActuatorCommand {
    /// Build a command for `target`.
    #[must_use]
    pub fn new(target: EntityRef, desired_state: DesiredState) -> Self {
        Self {
            target,
            desired_state,
        }
    }
}
