//! Hub adapter error types.

use proclink_domain::error::ActuatorError;

/// Errors specific to the hub HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum HassError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// The hub answered with an unexpected status.
    #[error("hub returned {status}")]
    Status {
        /// The status code received.
        status: reqwest::StatusCode,
    },

    /// The hub's response body could not be parsed.
    #[error("failed to parse hub response")]
    ResponseParse(#[source] reqwest::Error),
}

/// Classify a hub response status for a send targeting `entity`.
///
/// 2xx is success; 401/403 is a credential problem; 404 means the hub does
/// not know the entity; everything else is transient and eligible for retry.
pub(crate) fn classify_status(
    status: reqwest::StatusCode,
    entity: &str,
) -> Result<(), ActuatorError> {
    use reqwest::StatusCode;

    if status.is_success() {
        Ok(())
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(ActuatorError::Auth)
    } else if status == StatusCode::NOT_FOUND {
        Err(ActuatorError::UnknownEntity {
            entity: entity.to_string(),
        })
    } else {
        Err(ActuatorError::Transient(Box::new(HassError::Status {
            status,
        })))
    }
}

/// Map a transport-level failure (timeout, connection refused, …) for retry.
pub(crate) fn map_request_error(err: reqwest::Error) -> ActuatorError {
    ActuatorError::Transient(Box::new(err))
}
