//! First-run interactive setup.
//!
//! Prompts for the hub URL, API token, and entity id, verifies them against
//! the hub, and persists the resulting configuration. The core never sees any
//! of this; it only receives the fully populated `Config`.

use std::io::Write;
use std::path::Path;

use proclink_adapter_hub_hass::HassActuator;

use crate::config::{Config, ConfigError};

/// Errors raised during interactive setup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Reading from the terminal failed.
    #[error("failed to read input")]
    Io(#[from] std::io::Error),
    /// The resulting configuration could not be saved.
    #[error("failed to save configuration")]
    Config(#[from] ConfigError),
}

/// Prompt on stderr and read one trimmed line from stdin.
fn prompt(label: &str) -> std::io::Result<String> {
    eprint!("{label}: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Collect and verify hub settings, then save the configuration to `path`.
///
/// Loops until the entered credential passes a hub round-trip and the entity
/// is known, so the daemon never starts with settings that cannot actuate.
///
/// # Errors
///
/// Returns [`SetupError`] when the terminal cannot be read or the config
/// cannot be saved; verification failures re-prompt instead of failing.
pub async fn run(path: &Path) -> Result<Config, SetupError> {
    eprintln!("No configuration found, running first-time setup.");

    let config = loop {
        let mut config = Config::default();
        config.hub.base_url = prompt("Hub URL")?;
        config.hub.api_token = prompt("Hub API token")?;
        config.hub.entity_id = prompt("Entity to control (e.g. switch.desk_power)")?;
        config.monitor.process_name = {
            let name = prompt("Process to monitor [vrserver.exe]")?;
            if name.is_empty() {
                Config::default().monitor.process_name
            } else {
                name
            }
        };

        if let Err(err) = config.validate() {
            eprintln!("{err}, please try again");
            continue;
        }

        let entity = match config.entity() {
            Ok(entity) => entity,
            Err(err) => {
                eprintln!("{err}, please try again");
                continue;
            }
        };

        let actuator = match HassActuator::new(&config.hub_client()) {
            Ok(actuator) => actuator,
            Err(err) => {
                eprintln!("{err}, please try again");
                continue;
            }
        };

        if let Err(err) = actuator.check_credentials().await {
            eprintln!("Hub rejected the settings ({err}), please try again");
            continue;
        }

        match actuator.entity_state(&entity).await {
            Ok(state) => {
                eprintln!("Entity {entity} found (currently {state}).");
            }
            Err(err) => {
                eprintln!("Entity check failed ({err}), please try again");
                continue;
            }
        }

        break config;
    };

    config.save_to(path)?;
    eprintln!("Configuration saved to {}.", path.display());
    Ok(config)
}
