//! Configuration loading — TOML file with environment variable overrides.
//!
//! The file lives in the platform config directory (`proclink.toml`). The
//! monitor and logging sections have defaults; the hub section carries
//! credentials and has none, so a missing file sends `main` through the
//! first-run setup instead. Environment variables take precedence over file
//! values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use proclink_adapter_hub_hass::HubConfig;
use proclink_app::orchestrator::MonitorSettings;
use proclink_app::retry::RetryPolicy;
use proclink_domain::entity::EntityRef;

/// Name of the configuration file inside the config directory.
const CONFIG_NAME: &str = "proclink.toml";

/// Top-level configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Process monitoring settings.
    pub monitor: MonitorConfig,
    /// Hub connection and target entity.
    pub hub: HubSection,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Process monitoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Exact name of the process to monitor.
    pub process_name: String,
    /// Seconds between presence samples.
    pub poll_interval_secs: u64,
    /// Seconds of continuous absence before the entity is turned off.
    pub debounce_secs: u64,
}

/// Hub configuration: connection plus the entity driven by presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSection {
    /// Base URL of the hub, e.g. `http://homeassistant.local:8123`.
    pub base_url: String,
    /// Long-lived API token.
    pub api_token: String,
    /// Entity id to drive, in `domain.object` form.
    pub entity_id: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            process_name: "vrserver.exe".to_string(),
            poll_interval_secs: 3,
            debounce_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn,proclinkd=info,proclink=info".to_string(),
        }
    }
}

impl Config {
    /// The configuration file path inside the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when the platform provides no
    /// home directory to anchor it on.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = directories::ProjectDirs::from("dev", "proclink", "proclink")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join(CONFIG_NAME))
    }

    /// Load configuration from `path` and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when no file exists (first run) and
    /// parse/IO errors otherwise.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Persist the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns serialization or IO errors.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PROCLINK_PROCESS") {
            self.monitor.process_name = val;
        }
        if let Ok(val) = std::env::var("PROCLINK_HUB_URL") {
            self.hub.base_url = val;
        }
        if let Ok(val) = std::env::var("PROCLINK_API_TOKEN") {
            self.hub.api_token = val;
        }
        if let Ok(val) = std::env::var("PROCLINK_ENTITY") {
            self.hub.entity_id = val;
        }
        if let Ok(val) = std::env::var("PROCLINK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    /// Fail fast on an incomplete or inconsistent configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.process_name.is_empty() {
            return Err(ConfigError::Validation(
                "monitor.process_name must not be empty".to_string(),
            ));
        }
        if self.monitor.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "monitor.poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.hub.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "hub.base_url must not be empty".to_string(),
            ));
        }
        if self.hub.api_token.is_empty() {
            return Err(ConfigError::Validation(
                "hub.api_token must not be empty".to_string(),
            ));
        }
        self.entity()?;
        Ok(())
    }

    /// The validated target entity reference.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an empty or malformed id.
    pub fn entity(&self) -> Result<EntityRef, ConfigError> {
        EntityRef::new(self.hub.entity_id.clone())
            .map_err(|err| ConfigError::Validation(format!("hub.entity_id: {err}")))
    }

    /// Settings for the orchestrator's poll loop.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the entity id is invalid or a
    /// duration does not fit the clock types.
    pub fn monitor_settings(&self) -> Result<MonitorSettings, ConfigError> {
        let grace_secs = i64::try_from(self.monitor.debounce_secs).map_err(|_| {
            ConfigError::Validation("monitor.debounce_secs is out of range".to_string())
        })?;
        Ok(MonitorSettings {
            entity: self.entity()?,
            poll_interval: Duration::from_secs(self.monitor.poll_interval_secs),
            grace: TimeDelta::seconds(grace_secs),
            retry: RetryPolicy::default(),
        })
    }

    /// Connection settings for the hub adapter.
    #[must_use]
    pub fn hub_client(&self) -> HubConfig {
        HubConfig {
            base_url: self.hub.base_url.clone(),
            api_token: self.hub.api_token.clone(),
            request_timeout_secs: if self.hub.request_timeout_secs == 0 {
                10
            } else {
                self.hub.request_timeout_secs
            },
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file exists yet; run first-time setup.
    #[error("configuration file not found")]
    NotFound,
    /// The platform offers no config directory.
    #[error("no platform config directory available")]
    NoConfigDir,
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[source] toml::de::Error),
    /// TOML serialization failure.
    #[error("failed to serialize config file")]
    Serialize(#[source] toml::ser::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.hub.base_url = "http://hub.local:8123".to_string();
        config.hub.api_token = "token".to_string();
        config.hub.entity_id = "switch.desk_power".to_string();
        config
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.monitor.process_name, "vrserver.exe");
        assert_eq!(config.monitor.poll_interval_secs, 3);
        assert_eq!(config.monitor.debounce_secs, 60);
        assert!(config.hub.base_url.is_empty());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r#"
            [monitor]
            process_name = "game.exe"
            poll_interval_secs = 10
            debounce_secs = 30

            [hub]
            base_url = "http://hub.local:8123"
            api_token = "abc"
            entity_id = "switch.desk_power"
            request_timeout_secs = 5

            [logging]
            filter = "debug"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.monitor.process_name, "game.exe");
        assert_eq!(config.monitor.poll_interval_secs, 10);
        assert_eq!(config.hub.entity_id, "switch.desk_power");
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = r#"
            [hub]
            base_url = "http://hub.local:8123"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 3);
        assert_eq!(config.hub.base_url, "http://hub.local:8123");
    }

    #[test]
    fn should_report_not_found_for_missing_file() {
        let result = Config::read_file(Path::new("/nonexistent/proclink.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn should_accept_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn should_reject_empty_process_name() {
        let mut config = valid();
        config.monitor.process_name.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("process_name")
        ));
    }

    #[test]
    fn should_reject_zero_poll_interval() {
        let mut config = valid();
        config.monitor.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_base_url() {
        let mut config = valid();
        config.hub.base_url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_api_token() {
        let mut config = valid();
        config.hub.api_token.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_malformed_entity_id() {
        let mut config = valid();
        config.hub.entity_id = "desk_power".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_allow_zero_debounce() {
        let mut config = valid();
        config.monitor.debounce_secs = 0;
        assert!(config.validate().is_ok());
        let settings = config.monitor_settings().unwrap();
        assert_eq!(settings.grace, TimeDelta::zero());
    }

    #[test]
    fn should_build_monitor_settings() {
        let settings = valid().monitor_settings().unwrap();
        assert_eq!(settings.poll_interval, Duration::from_secs(3));
        assert_eq!(settings.grace, TimeDelta::seconds(60));
        assert_eq!(settings.entity.as_str(), "switch.desk_power");
    }

    #[test]
    fn should_default_hub_timeout_when_unset() {
        assert_eq!(valid().hub_client().request_timeout_secs, 10);
    }

    #[test]
    fn should_roundtrip_through_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("proclink-test-{}", std::process::id()))
            .join(CONFIG_NAME);
        let config = valid();
        config.save_to(&path).unwrap();

        let loaded = Config::read_file(&path).unwrap();
        assert_eq!(loaded.hub.base_url, config.hub.base_url);
        assert_eq!(loaded.hub.entity_id, config.hub.entity_id);
        assert_eq!(loaded.monitor.process_name, config.monitor.process_name);

        let _ = std::fs::remove_file(&path);
    }
}
