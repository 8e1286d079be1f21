//! # proclink-adapter-hub-hass
//!
//! [`Actuator`] implementation speaking a Home Assistant style HTTP API.
//!
//! One service call per command:
//! `POST {base}/api/services/{domain}/turn_on|turn_off` with a bearer token
//! and a JSON body naming the entity. The service domain is derived from the
//! entity id's `domain.object` form. Also exposes the credential and
//! entity-state checks used by first-run setup.
//!
//! ## Dependency rule
//! Depends on `proclink-app` (for the port) and `proclink-domain`. Never
//! imported by either.

pub mod config;
pub mod error;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use proclink_app::ports::Actuator;
use proclink_domain::command::ActuatorCommand;
use proclink_domain::entity::EntityRef;
use proclink_domain::error::ActuatorError;

pub use config::HubConfig;
pub use error::HassError;

use error::{classify_status, map_request_error};

/// Body of a `turn_on` / `turn_off` service call.
#[derive(Debug, Serialize)]
struct ServiceCallBody<'a> {
    entity_id: &'a str,
}

/// The hub's view of an entity, as returned by `/api/states/{id}`.
#[derive(Debug, Deserialize)]
struct StateResponse {
    state: String,
}

/// Hub actuator over HTTP.
pub struct HassActuator {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HassActuator {
    /// Build an actuator from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &HubConfig) -> Result<Self, HassError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(HassError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// The service-call URL for a command.
    fn service_url(&self, command: &ActuatorCommand) -> String {
        format!(
            "{}/api/services/{}/{}",
            self.base_url,
            command.target.service_domain(),
            command.desired_state.service()
        )
    }

    /// Validate the credential by hitting the API root.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError::Auth`] for a rejected credential and
    /// [`ActuatorError::Transient`] for transport failures or other
    /// unexpected statuses.
    pub async fn check_credentials(&self) -> Result<(), ActuatorError> {
        let response = self
            .client
            .get(format!("{}/api/", self.base_url))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            Err(ActuatorError::Auth)
        } else {
            Err(ActuatorError::Transient(Box::new(HassError::Status {
                status,
            })))
        }
    }

    /// Fetch the hub's current state string for `entity` (e.g. `on`, `off`).
    ///
    /// # Errors
    ///
    /// Same classification as a send: 401/403 → `Auth`, 404 →
    /// `UnknownEntity`, transport failures and other statuses → `Transient`.
    pub async fn entity_state(&self, entity: &EntityRef) -> Result<String, ActuatorError> {
        let response = self
            .client
            .get(format!("{}/api/states/{}", self.base_url, entity))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(map_request_error)?;

        classify_status(response.status(), entity.as_str())?;

        let body: StateResponse = response
            .json()
            .await
            .map_err(|err| ActuatorError::Transient(Box::new(HassError::ResponseParse(err))))?;
        Ok(body.state)
    }
}

impl Actuator for HassActuator {
    fn send(
        &self,
        command: &ActuatorCommand,
    ) -> impl Future<Output = Result<(), ActuatorError>> + Send {
        let url = self.service_url(command);
        async move {
            tracing::debug!(%url, entity = %command.target, "calling hub service");
            let response = self
                .client
                .post(url)
                .bearer_auth(&self.api_token)
                .json(&ServiceCallBody {
                    entity_id: command.target.as_str(),
                })
                .send()
                .await
                .map_err(map_request_error)?;

            classify_status(response.status(), command.target.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proclink_domain::command::DesiredState;

    fn actuator() -> HassActuator {
        HassActuator::new(&HubConfig {
            base_url: "http://hub.local:8123/".to_string(),
            api_token: "token".to_string(),
            request_timeout_secs: 10,
        })
        .unwrap()
    }

    fn command(desired: DesiredState) -> ActuatorCommand {
        ActuatorCommand::new(EntityRef::new("switch.desk_power").unwrap(), desired)
    }

    #[tokio::test]
    async fn should_build_turn_on_service_url() {
        let url = actuator().service_url(&command(DesiredState::On));
        assert_eq!(url, "http://hub.local:8123/api/services/switch/turn_on");
    }

    #[tokio::test]
    async fn should_build_turn_off_service_url() {
        let url = actuator().service_url(&command(DesiredState::Off));
        assert_eq!(url, "http://hub.local:8123/api/services/switch/turn_off");
    }

    #[tokio::test]
    async fn should_use_entity_domain_as_service_domain() {
        let command = ActuatorCommand::new(
            EntityRef::new("light.lab_strip").unwrap(),
            DesiredState::On,
        );
        let url = actuator().service_url(&command);
        assert_eq!(url, "http://hub.local:8123/api/services/light/turn_on");
    }

    #[test]
    fn should_serialize_service_call_body() {
        let body = ServiceCallBody {
            entity_id: "switch.desk_power",
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, "{\"entity_id\":\"switch.desk_power\"}");
    }

    #[test]
    fn should_parse_state_response() {
        let body: StateResponse = serde_json::from_str("{\"state\":\"on\",\"extra\":1}").unwrap();
        assert_eq!(body.state, "on");
    }
}
