//! # proclinkd — proclink daemon
//!
//! Composition root that wires the presence source, the monitor, and the hub
//! adapter together and runs the poll loop.
//!
//! ## Responsibilities
//! - Load the configuration file, running first-time setup when it is missing
//! - Initialize `tracing` with an env-filter
//! - Construct the adapters (sysinfo presence source, hub HTTP actuator)
//! - Construct the orchestrator, injecting adapters via port traits
//! - Handle graceful shutdown (ctrl-c → cancellation token)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod setup;
mod sink;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use proclink_adapter_hub_hass::HassActuator;
use proclink_adapter_presence_sysinfo::SysinfoPresenceSource;
use proclink_app::orchestrator::Orchestrator;

use config::{Config, ConfigError};
use sink::TracingEventSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = Config::default_path()?;
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(ConfigError::NotFound) => setup::run(&config_path).await?,
        Err(err) => return Err(err.into()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Fail fast: an incomplete configuration must not start the loop.
    config.validate()?;

    let source = SysinfoPresenceSource::new(config.monitor.process_name.clone());
    let actuator = HassActuator::new(&config.hub_client())?;
    let settings = config.monitor_settings()?;

    tracing::info!(
        process = %config.monitor.process_name,
        entity = %settings.entity,
        "proclinkd starting"
    );

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("shutdown signal received"),
            Err(err) => tracing::error!(%err, "failed to listen for shutdown signal"),
        }
        signal_token.cancel();
    });

    Orchestrator::new(source, actuator, TracingEventSink, settings)
        .run(shutdown)
        .await;

    Ok(())
}
