use anyhow::Result;
use greenplug::config::Config;
use greenplug::controller::Controller;
use greenplug::logging::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Greenplug green-energy switch controller starting up");

    let controller = Controller::from_config(config)
        .map_err(|e| anyhow::anyhow!("Failed to create controller: {}", e))?;

    match controller.run_once().await {
        Ok(outcome) => {
            info!("Run complete: {:?}", outcome);
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {}", e);
            Err(anyhow::anyhow!("Run failed: {}", e))
        }
    }
}
