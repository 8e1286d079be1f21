//! Actuator port — delivering on/off commands to the hub.

use std::future::Future;
use std::sync::Arc;

use proclink_domain::command::ActuatorCommand;
use proclink_domain::error::ActuatorError;

/// Sends a single state-change request to the hub.
///
/// Exactly one request reaches the hub per successful call; there is no
/// batching. The call is bounded by a request timeout so a hub outage cannot
/// stall the poll loop indefinitely.
pub trait Actuator: Send + Sync {
    /// Drive the command's target entity to its desired state.
    fn send(
        &self,
        command: &ActuatorCommand,
    ) -> impl Future<Output = Result<(), ActuatorError>> + Send;
}

impl<T: Actuator> Actuator for Arc<T> {
    fn send(
        &self,
        command: &ActuatorCommand,
    ) -> impl Future<Output = Result<(), ActuatorError>> + Send {
        (**self).send(command)
    }
}
