//! Error types shared across the workspace.
//!
//! Each layer defines typed errors; adapters convert their local errors into
//! these before crossing a port boundary.

/// Validation failures for domain values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The entity reference was empty.
    #[error("entity id must not be empty")]
    EmptyEntityId,

    /// The entity reference was not in `domain.object` form.
    #[error("entity id `{0}` must be in `domain.object` form")]
    MalformedEntityId(String),
}

/// Failure modes of an actuator send, as seen across the actuator port.
///
/// The split drives the orchestrator's retry policy: only
/// [`Transient`](Self::Transient) failures are worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    /// The hub rejected the API credential. Fatal for the command; must be
    /// surfaced to the operator rather than retried.
    #[error("hub rejected the API credential")]
    Auth,

    /// The hub does not know the target entity. A configuration problem,
    /// fatal for the command.
    #[error("hub does not know entity `{entity}`")]
    UnknownEntity {
        /// The entity id the hub rejected.
        entity: String,
    },

    /// Timeout, connection failure, or a 5xx response. Eligible for bounded
    /// retry.
    #[error("transient hub failure")]
    Transient(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ActuatorError {
    /// Whether this failure should stop retries for the current command.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Transient(_))
    }
}
