//! Entity reference — the hub-side identifier of the controlled entity.
//!
//! Hub entity ids follow the `domain.object` convention
//! (e.g. `switch.desk_power`); the domain segment doubles as the service
//! namespace used when calling the hub.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated reference to a hub entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityRef(String);

impl EntityRef {
    /// Validate and wrap a hub entity id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyEntityId`] for an empty string and
    /// [`ValidationError::MalformedEntityId`] when the id is not in
    /// `domain.object` form.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyEntityId);
        }
        match id.split_once('.') {
            Some((domain, object)) if !domain.is_empty() && !object.is_empty() => Ok(Self(id)),
            _ => Err(ValidationError::MalformedEntityId(id)),
        }
    }

    /// The full entity id as the hub knows it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `domain` segment of the id, used as the hub service namespace.
    #[must_use]
    pub fn service_domain(&self) -> &str {
        // Validated at construction, a `.` is always present.
        self.0.split_once('.').map_or(&self.0, |(domain, _)| domain)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityRef {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityRef {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityRef> for String {
    fn from(value: EntityRef) -> Self {
        value.0
    }
}
