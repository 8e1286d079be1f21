//! Hub connection configuration.

use serde::{Deserialize, Serialize};

fn default_request_timeout_secs() -> u64 {
    10
}

/// Connection settings for the hub's HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Base URL of the hub, e.g. `http://homeassistant.local:8123`.
    pub base_url: String,
    /// Long-lived API token carried as a bearer credential.
    pub api_token: String,
    /// Per-request timeout so a hub outage cannot stall a poll tick.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            base_url = "http://hub.local:8123"
            api_token = "abc123"
            request_timeout_secs = 5
        "#;
        let config: HubConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "http://hub.local:8123");
        assert_eq!(config.api_token, "abc123");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn should_default_request_timeout() {
        let toml = r#"
            base_url = "http://hub.local:8123"
            api_token = "abc123"
        "#;
        let config: HubConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.request_timeout_secs, 10);
    }
}
